//! Schema module
//!
//! Turns heterogeneous tabular input into canonical [`crate::types::StudentRecord`]s:
//! - CSV reading/writing
//! - Column alias normalization with non-fatal missing-column warnings
//! - Ingestion, manual entry and student export

pub mod csv;
pub mod ingest;
pub mod normalizer;

pub use ingest::{export_students_csv, ingest_csv, ingest_file, manual_entry, Ingested};
pub use normalizer::{normalize_row, normalize_rows, Normalized, ValidationWarning, COLUMN_ALIASES};
