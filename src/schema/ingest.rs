//! CSV ingestion and student export

use crate::errors::{Result, ShieldError};
use crate::schema::csv::{parse_csv, write_csv};
use crate::schema::normalizer::{normalize_rows, ValidationWarning};
use crate::scoring::predictor::DEFAULT_CLASS;
use crate::types::{StudentRecord, FEATURE_COLUMNS, IDENTITY_COLUMNS};
use std::path::Path;
use tracing::{debug, warn};

/// Rows read from one CSV source
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<StudentRecord>,
    pub warning: ValidationWarning,
}

/// Parse and normalize CSV text. A malformed file is a `Parse` error.
pub fn ingest_csv(text: &str) -> Result<Ingested> {
    let rows = parse_csv(text)?;
    let (records, warning) = normalize_rows(&rows);
    if !warning.is_empty() && !records.is_empty() {
        warn!("{}", warning);
    }
    debug!(rows = records.len(), "ingested csv");
    Ok(Ingested { records, warning })
}

/// Read and ingest a CSV file from disk
pub async fn ingest_file(path: &Path) -> Result<Ingested> {
    let text = tokio::fs::read_to_string(path).await?;
    ingest_csv(&text)
}

/// Render students as CSV: identity columns then the 15 canonical features
pub fn export_students_csv(records: &[StudentRecord]) -> String {
    let header: Vec<&str> = IDENTITY_COLUMNS
        .iter()
        .chain(FEATURE_COLUMNS.iter())
        .copied()
        .collect();
    let rows = records.iter().map(|record| {
        header
            .iter()
            .map(|col| record.get(col).unwrap_or_default().to_string())
            .collect::<Vec<_>>()
    });
    write_csv(&header, rows)
}

/// Prepare one hand-entered student for appending after `existing`.
///
/// Every field is trimmed and a name is required. A blank class becomes
/// `N/A`. A blank id continues the numbering: the last student's numeric id
/// plus one, or the row count plus one when that id is blank or not a number.
pub fn manual_entry(existing: &[StudentRecord], entry: StudentRecord) -> Result<StudentRecord> {
    let mut record = StudentRecord::default();
    for col in IDENTITY_COLUMNS.iter().chain(FEATURE_COLUMNS.iter()) {
        record.set(col, entry.get(col).unwrap_or_default().trim().to_string());
    }

    if record.name.is_empty() {
        return Err(ShieldError::InvalidInput("name is required".to_string()));
    }
    if record.class_name.is_empty() {
        record.class_name = DEFAULT_CLASS.to_string();
    }
    if record.id.is_empty() {
        record.id = next_id(existing).to_string();
    }
    Ok(record)
}

fn next_id(existing: &[StudentRecord]) -> u64 {
    let count = existing.len() as u64;
    match existing.last() {
        None => 1,
        Some(last) => last.id.trim().parse::<u64>().unwrap_or(count) + 1,
    }
}
