//! Tier counts overall and per class

use crate::scoring::classifier::RiskTier;
use crate::scoring::predictor::DEFAULT_CLASS;
use crate::types::PredictionResult;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::High => self.high += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBreakdown {
    pub class_name: String,
    pub counts: TierCounts,
}

/// Aggregate risk view over a set of predictions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
    pub totals: TierCounts,
    /// Ordered by High count descending, then class name
    pub by_class: Vec<ClassBreakdown>,
}

impl RiskSummary {
    pub fn from_predictions(predictions: &[PredictionResult]) -> Self {
        let mut totals = TierCounts::default();
        let mut classes: BTreeMap<String, TierCounts> = BTreeMap::new();

        for prediction in predictions {
            totals.add(prediction.risk_tier);
            let class_name = match prediction.class_name.trim() {
                "" => DEFAULT_CLASS.to_string(),
                name => name.to_string(),
            };
            classes.entry(class_name).or_default().add(prediction.risk_tier);
        }

        let mut by_class: Vec<ClassBreakdown> = classes
            .into_iter()
            .map(|(class_name, counts)| ClassBreakdown { class_name, counts })
            .collect();
        // BTreeMap order already sorts by name; a stable sort keeps it for ties
        by_class.sort_by(|a, b| b.counts.high.cmp(&a.counts.high));

        Self { totals, by_class }
    }

    pub fn total(&self) -> usize {
        self.totals.total()
    }
}
