//! Segmenter error types

use thiserror::Error;

/// Segmentation errors
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// Empty input record set (caller validation)
    #[error("no records to split; add at least one input record")]
    NoRecords,

    /// The scoring scan selected a split that produced an empty segment.
    ///
    /// This happens when no index can improve on the initial score, e.g. a
    /// single-character text that still exceeds the budget. Surfaced as a
    /// distinct error instead of looping.
    #[error("degenerate split at char offset {offset}: cannot reduce below the token budget")]
    DegenerateSplit { offset: usize },

    /// Worklist exceeded its iteration cap without converging
    #[error("segmentation did not converge after {visits} range visits ({char_len} chars)")]
    NonConvergent { visits: usize, char_len: usize },

    /// Segmentation of a specific record failed
    #[error("failed to segment record '{path}': {source}")]
    Record {
        path: String,
        #[source]
        source: Box<SegmenterError>,
    },

    /// Unknown token counter encoding name
    #[error("unknown token encoding '{name}'")]
    UnknownEncoding { name: String },

    /// Token counter backend failed to initialize
    #[error("token counter init failed for '{encoding}': {message}")]
    TokenizerInit { encoding: String, message: String },
}

impl SegmenterError {
    /// Attach the owning record's path to a segmentation error.
    pub fn for_record(self, path: impl Into<String>) -> Self {
        Self::Record {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
