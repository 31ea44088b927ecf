//! Error taxonomy for the simulation core
//!
//! Every fallible core operation returns [`SimulationError`]. The variants map
//! one-to-one onto the failure classes callers are expected to distinguish:
//! bad request input, a malformed dataset, a model that does not fit the
//! feature schema, and a model that failed during inference.

use thiserror::Error;

/// Result alias used throughout the simulation core.
pub type SimResult<T> = Result<T, SimulationError>;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Unparseable date, non-numeric or non-positive target, bad cell value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataset lacks a column the feature builder depends on.
    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    /// Model input ordering does not match the fixed feature schema.
    #[error("Feature schema mismatch: model expects {expected:?}, schema is {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Underlying model raised during inference. Never retried.
    #[error("Predictor failed: {0}")]
    Predictor(String),

    /// Model file could not be read or is internally inconsistent.
    #[error("Model file error: {0}")]
    ModelFile(String),

    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    /// Whether the failure was caused by the caller's request rather than
    /// by the dataset, the model, or the host environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::Predictor(_) => "PREDICTOR_ERROR",
            Self::ModelFile(_) => "MODEL_FILE_ERROR",
            Self::Io(_) | Self::Csv(_) => "DATASET_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_client_error() {
        assert!(SimulationError::InvalidInput("bad date".into()).is_client_error());
        assert!(!SimulationError::MissingColumn("wsi".into()).is_client_error());
        assert!(!SimulationError::Predictor("boom".into()).is_client_error());
    }

    #[test]
    fn test_schema_mismatch_message_lists_both_sides() {
        let err = SimulationError::SchemaMismatch {
            expected: vec!["a".into()],
            actual: vec!["b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"a\""));
        assert!(msg.contains("\"b\""));
        assert_eq!(err.code(), "SCHEMA_MISMATCH");
    }
}
