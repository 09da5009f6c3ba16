//! Intake error types

use thiserror::Error;
use shared::{LineIndex, SharedError};

use crate::types::MissingReason;

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Intake error types
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Transport or HTTP failure. `status` is absent when no response arrived.
    #[error("{method} {url} failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    NetworkError {
        status: Option<u16>,
        method: String,
        url: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Order parsing failed: {source}")]
    ParseError {
        #[source]
        source: Box<IntakeError>,
    },

    #[error("Validation failed: {message}")]
    ValidationError { message: String },

    #[error("Batch is not ready for submission: {}", describe_missing(.missing))]
    IncompleteBatchError { missing: Vec<(LineIndex, MissingReason)> },

    #[error("Line {line} is not in the current batch")]
    LineNotFound { line: LineIndex },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Session store error: {message}")]
    SessionError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IntakeError {
    /// HTTP status of a network failure, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            IntakeError::NetworkError { status, .. } => *status,
            IntakeError::ParseError { source } => source.status(),
            _ => None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        IntakeError::ValidationError { message: message.into() }
    }
}

fn describe_missing(missing: &[(LineIndex, MissingReason)]) -> String {
    if missing.is_empty() {
        return "batch is empty".to_string();
    }
    missing
        .iter()
        .map(|(line, reason)| format!("{line} {reason}"))
        .collect::<Vec<_>>()
        .join(", ")
}
