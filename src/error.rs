//! Error types for analysis configuration, input decoding and histogram bookkeeping

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    #[error("Unknown histogram: {0}")]
    UnknownHistogram(String),

    #[error("Histogram already registered: {0}")]
    DuplicateHistogram(String),

    #[error("Histogram {name} is {actual}, expected {expected}")]
    HistogramKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Input error at line {line}: {message}")]
    Input { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::SerializationError(err.to_string())
    }
}
