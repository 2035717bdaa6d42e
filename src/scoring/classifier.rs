//! Probability to risk tier mapping
//!
//! Every code path (local heuristic, remote merge, aggregate fallback) goes
//! through [`classify`].

use crate::scoring::patterns;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability above which a student is High risk
pub const HIGH_THRESHOLD: f64 = 0.7;

/// Probability above which a student is Medium risk
pub const MEDIUM_THRESHOLD: f64 = 0.4;

/// Discrete risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Interpret a free-text label from the remote predictor
    /// ("High Risk", "Moderate Risk", ...). Anything unrecognized is Low.
    pub fn from_label(label: &str) -> Self {
        if patterns::high_label().is_match(label) {
            RiskTier::High
        } else if patterns::medium_label().is_match(label) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a probability onto a tier. Boundary values fall to the lower tier.
pub fn classify(probability: f64) -> RiskTier {
    if probability > HIGH_THRESHOLD {
        RiskTier::High
    } else if probability > MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
