//! Mock record source for tests without a filesystem

use contracts::TextRecord;

use crate::error::Result;
use crate::source::RecordSource;

/// Source backed by a fixed record list
pub struct MockSource {
    id: String,
    records: Vec<TextRecord>,
}

impl MockSource {
    /// Create a mock source yielding `records`
    pub fn new(id: impl Into<String>, records: Vec<TextRecord>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }

    /// Create a mock source from (path, content) pairs
    pub fn from_pairs(id: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        let records = pairs
            .iter()
            .map(|(path, content)| TextRecord::new(*path, *content))
            .collect();
        Self::new(id, records)
    }
}

impl RecordSource for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn collect(&self) -> Result<Vec<TextRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_yields_fixed_records() {
        let source = MockSource::from_pairs("fixture", &[("a.txt", "alpha"), ("b.txt", "beta")]);
        let records = source.collect().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "a.txt");
        assert_eq!(source.id(), "fixture");
    }
}
