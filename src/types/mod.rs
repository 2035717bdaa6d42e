//! Type definitions module
//!
//! Core data model shared by ingestion, scoring, and the data sources.

pub mod record;
pub mod snapshot;

// Re-export commonly used types
pub use record::{
    raw_row_from_json, Identity, RawRow, StudentRecord, FEATURE_COLUMNS, IDENTITY_COLUMNS,
    PROVENANCE_COLUMN,
};
pub use snapshot::{Origin, PredictionResult, Snapshot};
