use std::path::PathBuf;

use thiserror::Error;

/// Represents all errors that can occur while loading or saving a state
/// document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file that failed.
        path:   PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The document is not valid JSON or misses required fields.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document declares a format version this crate cannot read.
    #[error("unsupported document version {found}, expected {expected}")]
    UnsupportedVersion {
        /// The version found in the document.
        found:    u32,
        /// The version this crate writes.
        expected: u32,
    },
}
