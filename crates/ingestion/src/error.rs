//! Ingestion error types

use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Source path does not exist
    #[error("source path '{path}' does not exist")]
    SourceNotFound {
        /// Configured path
        path: String,
    },

    /// Source path is neither a regular file nor a directory
    #[error("source path '{path}' is not a file or directory")]
    NotReadable {
        /// Configured path
        path: String,
    },

    /// Directory traversal failed
    #[error("failed to walk '{path}': {message}")]
    Walk {
        /// Path being walked
        path: String,
        /// Error message
        message: String,
    },

    /// A source file could not be read
    #[error("failed to read '{path}': {message}")]
    Read {
        /// File path
        path: String,
        /// Error message
        message: String,
    },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
