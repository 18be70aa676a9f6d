//! TextRecord - the unit of work flowing through the pipeline
//!
//! Records are created by ingestion, possibly replaced 1:N by the segmenter,
//! and finally annotated with `saved` by the dispatcher. No record outlives
//! the session.

use serde::{Deserialize, Serialize};

/// A text-bearing record with a stable path-like identity.
///
/// Optional fields are skipped during serialization so the JSON payload sent
/// to the memory store stays minimal (`{"path": ..., "content": ...}` for a
/// plain source file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Stable identity; derived segments get `"{path}_{index}"`
    pub path: String,

    /// Raw text content
    pub content: String,

    /// Page number for paginated sources (PDF)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Original file name when `path` is not descriptive enough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Set by the dispatcher: whether the remote store acknowledged the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

impl TextRecord {
    /// Create a plain record from an identity and its content.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            page: None,
            filename: None,
            saved: None,
        }
    }

    /// Derive a child record holding one segment of this record's content.
    ///
    /// The child inherits `page` and `filename`; `saved` starts unset.
    pub fn derive_segment(&self, index: usize, content: String) -> Self {
        Self {
            path: format!("{}_{}", self.path, index),
            content,
            page: self.page,
            filename: self.filename.clone(),
            saved: None,
        }
    }
}
