//! Dataset loading and persistence errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while loading or persisting a dataset.
///
/// These only occur at startup or during import, never while a query runs.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document line could not be decoded
    #[error("Malformed document at line {line}: {reason}")]
    MalformedDocument { line: usize, reason: String },
}
