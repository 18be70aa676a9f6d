//! Progress events - per-record observer callbacks
//!
//! Two distinct event kinds instead of a shared callback with a string
//! discriminator: one fired per original record as it is segmented, one per
//! segment acknowledged by the store. Callbacks are synchronous and
//! side-effecting only; their return value is never consumed.

use std::sync::Arc;

use crate::TextRecord;

/// Progress callback type
///
/// Uses `Arc` so the callback can be shared with the per-record dispatch
/// tasks spawned inside a batch.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// A progress notification from one of the two pipeline phases.
///
/// `total` is fixed for the whole phase: the pre-segmentation record count
/// for `Split`, the post-segmentation record count for `Dispatch`.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// One original record finished segmentation
    Split { record: TextRecord, total: usize },

    /// One segment was submitted to the memory store
    Dispatch { record: TextRecord, total: usize },
}

impl ProgressEvent {
    /// Phase name for logging and metrics labels.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Split { .. } => "split",
            Self::Dispatch { .. } => "vectorize",
        }
    }

    /// The record this event refers to.
    pub fn record(&self) -> &TextRecord {
        match self {
            Self::Split { record, .. } | Self::Dispatch { record, .. } => record,
        }
    }

    /// The fixed total for this event's phase.
    pub fn total(&self) -> usize {
        match self {
            Self::Split { total, .. } | Self::Dispatch { total, .. } => *total,
        }
    }
}
