//! RecordSource trait

use contracts::TextRecord;

use crate::error::Result;

/// A source of text records.
///
/// Implementations must be deterministic: collecting twice from an unchanged
/// source yields the same records in the same order.
pub trait RecordSource: Send + Sync {
    /// Stable identifier of this source (from configuration)
    fn id(&self) -> &str;

    /// Collect all records from this source
    fn collect(&self) -> Result<Vec<TextRecord>>;
}
