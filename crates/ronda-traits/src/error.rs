//! Error types for the Ronda pipeline.
//!
//! This module defines the error enum used throughout the Ronda crates.
//! Configuration and data errors are raised fail-fast at setup; per-fold
//! degeneracies are recovered locally by the evaluation loop and never
//! surface through this type.

use thiserror::Error;

/// The main error type for Ronda operations.
#[derive(Debug, Error)]
pub enum RondaError {
    /// A configuration parameter failed validation before the run started.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data violated the declared schema or was otherwise malformed.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required column is missing from an input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations at the ingestion or presentation edges.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The requested model backend identifier is not recognized.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// The requested device hint is not recognized.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// A model `fit` or `predict` call failed.
    ///
    /// These are never swallowed by the fold loop; a training failure
    /// indicates a data or configuration defect the caller must see.
    #[error("Model execution failed: {0}")]
    ModelExecution(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for RondaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for RondaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RondaError::InvalidConfig("threshold must be in [0, 1], got 1.5".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: threshold must be in [0, 1], got 1.5"
        );

        let err = RondaError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "Missing required column: close");
    }

    #[test]
    fn test_error_from_str() {
        let err: RondaError = "something broke".into();
        assert!(matches!(err, RondaError::Other(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(RondaError::UnknownBackend("lightgbm".to_string()));
        assert!(err_result.is_err());
    }
}
