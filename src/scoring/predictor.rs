//! Prediction service: remote model when reachable, local heuristic otherwise

use crate::features::{extract_features, parse_numeric};
use crate::remote::{AvailabilityMonitor, RemoteService, PROBABILITY_PERCENT_FIELD, RISK_LEVEL_FIELD};
use crate::scoring::classifier::{classify, RiskTier};
use crate::scoring::scorer::{finalize_probability, score_probability};
use crate::scoring::suggestions::suggest_actions;
use crate::types::{PredictionResult, RawRow, StudentRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Class shown when a row carries none
pub const DEFAULT_CLASS: &str = "N/A";

fn or_default(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}

fn build_result(index: usize, record: &StudentRecord, probability: f64) -> PredictionResult {
    let features = extract_features(record);
    let risk_tier = classify(probability);
    let suggestions = suggest_actions(&features, risk_tier);
    PredictionResult {
        id: or_default(&record.id, || (index + 1).to_string()),
        name: or_default(&record.name, || format!("Student {}", index + 1)),
        class_name: or_default(&record.class_name, || DEFAULT_CLASS.to_string()),
        probability,
        risk_tier,
        suggestions,
        features,
        provenance: record.teacher_id.clone(),
    }
}

/// Score one record with the local heuristic
pub fn score_record(index: usize, record: &StudentRecord) -> PredictionResult {
    let features = extract_features(record);
    build_result(index, record, score_probability(&features))
}

/// Score every record with the local heuristic
pub fn predict_local(records: &[StudentRecord]) -> Vec<PredictionResult> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| score_record(index, record))
        .collect()
}

/// Build a prediction from a remote row.
///
/// The remote probability is trusted (after clamping and rounding) but the
/// tier always comes from [`classify`]. A row without a usable probability
/// is scored locally.
pub fn prediction_from_remote(index: usize, record: &StudentRecord, row: &RawRow) -> PredictionResult {
    let percent = row
        .get(PROBABILITY_PERCENT_FIELD)
        .and_then(|raw| parse_numeric(raw));

    let Some(percent) = percent else {
        debug!(index, "Remote row has no probability, scoring locally");
        return score_record(index, record);
    };

    let result = build_result(index, record, finalize_probability(percent / 100.0));

    if let Some(label) = row.get(RISK_LEVEL_FIELD).filter(|l| !l.trim().is_empty()) {
        let remote_tier = RiskTier::from_label(label);
        if remote_tier != result.risk_tier {
            debug!(
                index,
                label = label.as_str(),
                tier = %result.risk_tier,
                "Remote risk label disagrees with computed tier"
            );
        }
    }

    result
}

/// Merge index-aligned remote rows onto the input records.
///
/// Identity always comes from the input record. Records without a
/// matching remote row are scored locally.
pub fn merge_remote(records: &[StudentRecord], rows: &[RawRow]) -> Vec<PredictionResult> {
    if rows.len() != records.len() {
        warn!(
            expected = records.len(),
            received = rows.len(),
            "Remote prediction count mismatch"
        );
    }
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match rows.get(index) {
            Some(row) => prediction_from_remote(index, record, row),
            None => score_record(index, record),
        })
        .collect()
}

/// Scores records through the remote model when it is up
pub struct Predictor {
    remote: Arc<dyn RemoteService>,
    monitor: Arc<AvailabilityMonitor>,
}

impl Predictor {
    pub fn new(remote: Arc<dyn RemoteService>, monitor: Arc<AvailabilityMonitor>) -> Self {
        Self { remote, monitor }
    }

    /// Predictions index-aligned with `records`
    pub async fn predict(&self, records: &[StudentRecord]) -> Vec<PredictionResult> {
        if records.is_empty() {
            return Vec::new();
        }

        if self.monitor.check(false).await {
            match self.remote.predict_bulk(records).await {
                Ok(rows) if !rows.is_empty() => {
                    info!(count = rows.len(), "Scored through remote predictor");
                    return merge_remote(records, &rows);
                }
                Ok(_) => warn!("Remote predictor returned no rows, using local heuristic"),
                Err(e) => warn!("Remote prediction failed, using local heuristic: {}", e),
            }
        } else {
            debug!("Remote predictor unavailable, using local heuristic");
        }

        predict_local(records)
    }
}
