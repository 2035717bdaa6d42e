//! Scoring module
//!
//! Heuristic dropout scoring, tier classification, intervention suggestions,
//! and the predictor service that prefers the remote model when it is up.

mod patterns;

pub mod classifier;
pub mod predictor;
pub mod scorer;
pub mod suggestions;
pub mod summary;

pub use classifier::{classify, RiskTier, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use predictor::{merge_remote, predict_local, prediction_from_remote, score_record, Predictor};
pub use scorer::{raw_score, score_probability};
pub use suggestions::suggest_actions;
pub use summary::{ClassBreakdown, RiskSummary, TierCounts};
