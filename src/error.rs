//! Error types for the sparsegrind library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum SparseGrindError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Matrix Market error: {0}")]
    MatrixMarket(String),

    #[error("Invalid value '{value}' at row {row}, column {col}")]
    InvalidValue {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Dimension overflow: {0} has too many entries to count")]
    DimensionOverflow(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported analysis: {0}")]
    UnsupportedAnalysis(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SparseGrindError>;
