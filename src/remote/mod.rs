//! Remote predictor module
//!
//! - HTTP client for the predictor endpoints
//! - Tagged decoding of its response shapes
//! - TTL-cached availability monitor

pub mod availability;
pub mod client;
pub mod response;
pub mod service;

// Re-export key types for convenience
pub use availability::{AvailabilityMonitor, AvailabilityState, Clock, ManualClock, SystemClock};
pub use client::{HttpRemoteClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use response::{decode_records, PROBABILITY_PERCENT_FIELD, RISK_LEVEL_FIELD};
pub use service::{HealthProbe, RemoteService, SaveMode};
