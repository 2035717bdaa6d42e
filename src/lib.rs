//! DropoutShield - dropout-risk inference with resilient data sourcing
//!
//! Raw per-student rows are normalized onto a canonical schema, turned into
//! typed features, scored into a probability and risk tier, and paired with
//! intervention suggestions. Data comes from whichever origin is reachable.
//!
//! # Architecture
//!
//! - **schema / features**: CSV ingestion, alias normalization, feature extraction
//! - **scoring**: heuristic scorer, classifier, suggestions, predictor service
//! - **remote**: HTTP client for the remote predictor and its availability monitor
//! - **sources**: bundled files, remote store, and local cache behind one resolver
//! - **persistence**: dual-tier save coordination

pub mod errors;
pub mod types;

pub mod features;
pub mod schema;
pub mod scoring;

pub mod persistence;
pub mod remote;
pub mod sources;

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{Result, ShieldError};
pub use scoring::RiskTier;
pub use types::{Identity, PredictionResult, Snapshot, StudentRecord};
