//! Feature extraction module
//!
//! Coerces canonical text fields into typed numeric/categorical features.

pub mod extractor;
pub mod vector;

pub use extractor::{extract_features, parse_categorical, parse_numeric};
pub use vector::FeatureVector;
