//! Prediction results and source snapshots

use crate::features::FeatureVector;
use crate::scoring::RiskTier;
use crate::types::record::StudentRecord;
use serde::{Deserialize, Serialize};

/// Scored outcome for one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Dropout probability in [0.01, 0.99], three decimals
    pub probability: f64,
    pub risk_tier: RiskTier,
    pub suggestions: Vec<String>,
    pub features: FeatureVector,
    /// Identity the row was loaded for, when merged across owners
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Remote,
    BundledFile,
    Cache,
    Empty,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Origin::Remote => "remote",
            Origin::BundledFile => "bundled-file",
            Origin::Cache => "cache",
            Origin::Empty => "empty",
        };
        write!(f, "{}", label)
    }
}

/// Students and their predictions as returned by one data source
///
/// When `predictions` is non-empty it is index-aligned with `students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub origin: Origin,
    pub students: Vec<StudentRecord>,
    pub predictions: Vec<PredictionResult>,
}

impl Snapshot {
    /// Nothing was found anywhere
    pub fn empty() -> Self {
        Self {
            origin: Origin::Empty,
            students: Vec::new(),
            predictions: Vec::new(),
        }
    }

    /// Raw rows that still need scoring
    pub fn unscored(origin: Origin, students: Vec<StudentRecord>) -> Self {
        Self {
            origin,
            students,
            predictions: Vec::new(),
        }
    }

    /// Rows with their predictions already attached
    pub fn scored(
        origin: Origin,
        students: Vec<StudentRecord>,
        predictions: Vec<PredictionResult>,
    ) -> Self {
        debug_assert_eq!(students.len(), predictions.len());
        Self {
            origin,
            students,
            predictions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Rows present but no predictions yet
    pub fn needs_scoring(&self) -> bool {
        !self.students.is_empty() && self.predictions.len() != self.students.len()
    }
}
