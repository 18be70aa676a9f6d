//! Layered error definitions
//!
//! Categorized by source: config / store / session

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Memory Store Errors =====
    /// Store connection error
    #[error("memory store connection error: {message}")]
    StoreConnection { message: String },

    /// Memory creation error
    #[error("memory create error: {message}")]
    StoreCreate { message: String },

    /// Segment submission error
    #[error("memory update error for '{record_path}': {message}")]
    StoreUpdate {
        record_path: String,
        message: String,
    },

    // ===== Session Errors =====
    /// Memory handle queried before the session was established
    #[error("memory handle is not established; call ensure_initialized first")]
    HandleNotEstablished,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create store connection error
    pub fn store_connection(message: impl Into<String>) -> Self {
        Self::StoreConnection {
            message: message.into(),
        }
    }

    /// Create memory creation error
    pub fn store_create(message: impl Into<String>) -> Self {
        Self::StoreCreate {
            message: message.into(),
        }
    }

    /// Create segment submission error
    pub fn store_update(record_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreUpdate {
            record_path: record_path.into(),
            message: message.into(),
        }
    }
}
