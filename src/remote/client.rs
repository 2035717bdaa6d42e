//! HTTP client for the remote dropout predictor
//!
//! Endpoints:
//! - `GET /` health
//! - `POST /predict_csv` multipart bulk scoring
//! - `GET|POST /teacher/{id}/data` per-owner fetch/save
//! - `DELETE /teacher/{id}/student/{sid}` single student removal
//! - `GET /principal/data` aggregate fetch

use crate::errors::{Result, ShieldError};
use crate::remote::response::decode_records;
use crate::remote::service::{HealthProbe, RemoteService, SaveMode};
use crate::schema::csv::write_csv;
use crate::types::{RawRow, StudentRecord, FEATURE_COLUMNS};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response, Url};
use std::time::Duration;
use tracing::debug;

/// Default predictor address
pub const DEFAULT_BASE_URL: &str = "http://localhost:9999";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the remote predictor
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: Url,
}

impl HttpRemoteClient {
    /// Create client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create client with custom base URL and timeout
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ShieldError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ShieldError::Config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ShieldError::Http)?;

        Ok(Self { client, base_url })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with extra path segments, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ShieldError::Config("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Remove one student from an owner's stored data
    pub async fn delete_student(&self, owner: &str, student_id: &str) -> Result<()> {
        let url = self.endpoint(&["teacher", owner, "student", student_id])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Failed to delete student: {}", e)))?;
        check_status(response)?;
        Ok(())
    }
}

/// Non-success statuses count as transport failures
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ShieldError::Transport(format!(
            "{} returned HTTP {}",
            response.url().path(),
            status
        )))
    }
}

async fn read_records(response: Response) -> Result<Vec<RawRow>> {
    let response = check_status(response)?;
    let body = response
        .bytes()
        .await
        .map_err(|e| ShieldError::Transport(format!("Failed to read response: {}", e)))?;
    decode_records(&body)
}

/// Bulk-upload CSV: fixed 15-column header, one line per record
pub fn bulk_upload_csv(records: &[StudentRecord]) -> String {
    let rows = records.iter().map(|record| {
        FEATURE_COLUMNS
            .iter()
            .map(|col| {
                record
                    .get(col)
                    .unwrap_or_default()
                    .replace(['\r', '\n'], " ")
                    .trim()
                    .to_string()
            })
            .collect::<Vec<_>>()
    });
    write_csv(&FEATURE_COLUMNS, rows)
}

#[async_trait]
impl HealthProbe for HttpRemoteClient {
    async fn probe(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl RemoteService for HttpRemoteClient {
    async fn predict_bulk(&self, records: &[StudentRecord]) -> Result<Vec<RawRow>> {
        let url = self.endpoint(&["predict_csv"])?;
        let part = multipart::Part::text(bulk_upload_csv(records))
            .file_name("data.csv")
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Bulk predict failed: {}", e)))?;
        read_records(response).await
    }

    async fn fetch_owner(&self, owner: &str) -> Result<Vec<RawRow>> {
        let url = self.endpoint(&["teacher", owner, "data"])?;
        let response = self
            .client
            .get(url)
            .query(&[("predict", "1")])
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Failed teacher fetch: {}", e)))?;
        read_records(response).await
    }

    async fn save_owner(
        &self,
        owner: &str,
        students: &[StudentRecord],
        mode: SaveMode,
    ) -> Result<Vec<RawRow>> {
        let url = self.endpoint(&["teacher", owner, "data"])?;
        let response = self
            .client
            .post(url)
            .query(&[("mode", mode.as_str())])
            .json(students)
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Failed teacher save: {}", e)))?;
        read_records(response).await
    }

    async fn fetch_aggregate(&self) -> Result<Vec<RawRow>> {
        let url = self.endpoint(&["principal", "data"])?;
        let response = self
            .client
            .get(url)
            .query(&[("predict", "1")])
            .send()
            .await
            .map_err(|e| ShieldError::Transport(format!("Failed aggregate fetch: {}", e)))?;
        read_records(response).await
    }
}
