//! Error taxonomy for vigil.

use std::path::PathBuf;

/// Errors produced while parsing threshold ranges or measured values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid threshold range '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    #[error("value '{value}' is not numeric")]
    NotNumeric { value: String },
}

impl RangeError {
    pub(crate) fn parse(expression: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by check accumulation and finalisation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("invalid state request: {0} is not a severity code (expected 0-3)")]
    InvalidStateRequest(i64),
}

/// Errors raised while loading logging configuration or installing sinks.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("permissions error, unable to write to log file ({})", .0.display())]
    LogFileNotWritable(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid logging configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;
