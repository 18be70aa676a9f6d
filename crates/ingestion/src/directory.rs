//! DirectorySource - recursive directory ingestion

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{SourceConfig, TextRecord};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::error::{IngestionError, Result};
use crate::source::RecordSource;

/// Source that reads every UTF-8 file under a directory tree.
///
/// Record paths are relative to the source root so two runs over copies of
/// the same tree produce identical records. Files that are not valid UTF-8
/// are skipped with a warning. A root that is itself a file yields a single
/// record named after the file.
pub struct DirectorySource {
    id: String,
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }

    /// Create a source from its configuration entry
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.id, &config.path)
    }

    fn record_path(&self, file: &Path) -> String {
        // A file root strips to "", fall back to the file name
        match file.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
            _ => file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string_lossy().into_owned()),
        }
    }
}

impl RecordSource for DirectorySource {
    fn id(&self) -> &str {
        &self.id
    }

    #[instrument(name = "directory_collect", skip(self), fields(source = %self.id, root = %self.root.display()))]
    fn collect(&self) -> Result<Vec<TextRecord>> {
        if !self.root.exists() {
            return Err(IngestionError::SourceNotFound {
                path: self.root.display().to_string(),
            });
        }
        if !self.root.is_dir() && !self.root.is_file() {
            return Err(IngestionError::NotReadable {
                path: self.root.display().to_string(),
            });
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| IngestionError::Walk {
                path: self.root.display().to_string(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let content = match fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    warn!(file = %entry.path().display(), "skipping non-UTF-8 file");
                    continue;
                }
                Err(e) => {
                    return Err(IngestionError::Read {
                        path: entry.path().display().to_string(),
                        message: e.to_string(),
                    });
                }
            };

            let mut record = TextRecord::new(self.record_path(entry.path()), content);
            record.filename = Some(entry.file_name().to_string_lossy().into_owned());
            records.push(record);
        }

        debug!(source = %self.id, records = records.len(), "collection complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(content).unwrap();
    }

    #[test]
    fn test_collect_is_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.txt", b"beta");
        write_file(dir.path(), "a.txt", b"alpha");
        write_file(dir.path(), "sub/c.txt", b"gamma");

        let source = DirectorySource::new("docs", dir.path());
        let records = source.collect().unwrap();

        let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "sub/c.txt"]);
        assert_eq!(records[0].content, "alpha");
        assert_eq!(records[2].filename.as_deref(), Some("c.txt"));
        assert!(records.iter().all(|r| r.saved.is_none()));
    }

    #[test]
    fn test_non_utf8_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "ok.txt", b"fine");
        write_file(dir.path(), "blob.bin", &[0xff, 0xfe, 0x00, 0x80]);

        let source = DirectorySource::new("docs", dir.path());
        let records = source.collect().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "ok.txt");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let source = DirectorySource::new("docs", "/nonexistent/path/for/test");
        let err = source.collect().unwrap_err();
        assert!(matches!(err, IngestionError::SourceNotFound { .. }));
    }

    #[test]
    fn test_file_root_yields_single_record() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "only.txt", b"text");

        let source = DirectorySource::new("docs", dir.path().join("only.txt"));
        let records = source.collect().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "only.txt");
        assert_eq!(records[0].content, "text");
        assert_eq!(records[0].filename.as_deref(), Some("only.txt"));
    }

    #[test]
    fn test_collect_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.md", b"first");
        write_file(dir.path(), "two.md", b"second");

        let source = DirectorySource::new("docs", dir.path());
        let first = source.collect().unwrap();
        let second = source.collect().unwrap();
        assert_eq!(first, second);
    }
}
