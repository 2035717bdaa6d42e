//! Remote predictor response decoding
//!
//! The predictor answers either with a bare array of records or with an
//! object wrapping them under `predictions`. Anything else is a format error.

use crate::errors::{Result, ShieldError};
use crate::types::{raw_row_from_json, RawRow};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Column carrying the remote probability, in percent
pub const PROBABILITY_PERCENT_FIELD: &str = "dropout_probability_percent";

/// Column carrying the remote tier label
pub const RISK_LEVEL_FIELD: &str = "risk_level";

/// The two accepted payload shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictionPayload {
    Bare(Vec<Map<String, Value>>),
    Wrapped { predictions: Vec<Map<String, Value>> },
}

impl PredictionPayload {
    pub fn into_records(self) -> Vec<Map<String, Value>> {
        match self {
            PredictionPayload::Bare(records) => records,
            PredictionPayload::Wrapped { predictions } => predictions,
        }
    }
}

/// Decode a response body into raw rows
pub fn decode_records(body: &[u8]) -> Result<Vec<RawRow>> {
    let payload: PredictionPayload = serde_json::from_slice(body).map_err(|e| {
        let preview: String = String::from_utf8_lossy(body).chars().take(80).collect();
        ShieldError::Format(format!("{} (body starts with {:?})", e, preview))
    })?;
    Ok(payload
        .into_records()
        .iter()
        .map(raw_row_from_json)
        .collect())
}
