//! Error types for the readshelf library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for readshelf operations.
#[derive(Debug, Error)]
pub enum ReadshelfError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export contained no importable rows.
    #[error("no valid books found in the export")]
    NoValidBooks,

    /// The backend preview request failed.
    #[error("failed to preview import: {0}")]
    PreviewFailed(String),

    /// The backend import request failed.
    #[error("failed to import books: {0}")]
    CommitFailed(String),

    /// A response arrived for a request that has since been superseded
    /// by a newer upload or a cancellation.
    #[error("response superseded by a newer upload or cancellation")]
    StaleResponse,

    /// The session is not in a state that allows the requested operation.
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    /// Book index out of range for the staged preview.
    #[error("book index {0} out of range")]
    BookIndex(usize),

    /// File format not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for readshelf operations.
pub type Result<T> = std::result::Result<T, ReadshelfError>;
