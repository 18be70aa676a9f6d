//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Empty input record set (caller validation)
    #[error("no records to dispatch; run segmentation first")]
    NoRecords,

    /// Non-positive token budget (caller validation)
    #[error("token budget must be positive")]
    InvalidBudget,

    /// Record could not be serialized for submission
    #[error("failed to serialize record '{path}': {message}")]
    Serialize { path: String, message: String },

    /// A submission task panicked or was aborted
    #[error("submission task failed to join: {message}")]
    TaskJoin { message: String },

    /// Store error (from contract)
    #[error("store error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a serialization error
    pub fn serialize(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            path: path.into(),
            message: message.into(),
        }
    }
}
