//! Error types for this crate.
use thiserror::Error;

/// Any kind of fault that can abort one of the pipeline operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("source '{0}' not found")]
    SourceNotFound(std::path::PathBuf),
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("unsupported {kind} '{value}'")]
    UnsupportedFormat { kind: &'static str, value: String },
    #[error("{0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProcessResult<T> = Result<T, ProcessError>;
