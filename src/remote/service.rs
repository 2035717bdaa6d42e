//! Seams between the pipeline and the remote predictor
//!
//! Production code uses [`crate::remote::HttpRemoteClient`]; tests substitute
//! in-memory implementations.

use crate::errors::Result;
use crate::types::{RawRow, StudentRecord};
use async_trait::async_trait;

/// Lightweight reachability check
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `true` when the service answered with a success status
    async fn probe(&self) -> bool;
}

/// How a save treats data already stored remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Replace,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::Replace => "replace",
        }
    }
}

/// Remote predictor operations
///
/// Returned rows are raw: they may carry `dropout_probability_percent` and
/// `risk_level` next to the student columns.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Score rows through the remote model; output is index-aligned with input
    async fn predict_bulk(&self, records: &[StudentRecord]) -> Result<Vec<RawRow>>;

    /// Stored rows for one owner
    async fn fetch_owner(&self, owner: &str) -> Result<Vec<RawRow>>;

    /// Store rows for one owner
    async fn save_owner(
        &self,
        owner: &str,
        students: &[StudentRecord],
        mode: SaveMode,
    ) -> Result<Vec<RawRow>>;

    /// Stored rows for every owner, tagged with `teacher_id`
    async fn fetch_aggregate(&self) -> Result<Vec<RawRow>>;
}
