//! Error types for DropoutShield
//!
//! Transport and format failures are expected during source fallback and are
//! demoted to "source unavailable" by the resolver; parse failures are fatal
//! to a single file only.

use thiserror::Error;

/// Main error type for the DropoutShield pipeline
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Network or reachability failure talking to the remote predictor
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body had a shape we do not recognize
    #[error("Unrecognized response format: {0}")]
    Format(String),

    /// Malformed CSV input
    #[error("CSV parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any source or tier was touched
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShieldError {
    /// Whether the error means "this source is not reachable right now"
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ShieldError::Transport(_) | ShieldError::Http(_) | ShieldError::Format(_)
        )
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ShieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ShieldError::Parse {
            line: 7,
            reason: "unterminated quoted field".to_string(),
        };
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(ShieldError::Transport("refused".into()).is_unavailable());
        assert!(ShieldError::Format("number".into()).is_unavailable());
        assert!(!ShieldError::Config("bad".into()).is_unavailable());
        assert!(!ShieldError::InvalidInput("name".into()).is_unavailable());
        assert!(!ShieldError::Parse { line: 1, reason: "x".into() }.is_unavailable());
    }
}
