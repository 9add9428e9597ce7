//! Error types for biosup.

use thiserror::Error;

/// Result type for biosup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for biosup operations.
///
/// Core attribute operations (`filter`, `extract`, `normalize`, `equal`)
/// never fail: absence and ambiguity are expressed as `None`/empty. Only
/// IO and parsing surfaces produce these errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/serialize error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Corpus file had an unexpected shape.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
