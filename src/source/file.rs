//! File-based data source.
//!
//! Reads a JSON snapshot file on every fetch. Handy for replaying an export
//! of the store or for running without network access.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{snapshot_from_value, DataSource, TelemetrySnapshot};
use crate::error::SourceError;

/// A data source that reads telemetry snapshots from a JSON file.
///
/// The file holds the same object the store serves: record ids mapped to
/// raw records. It is re-read on each fetch, so edits show up on the next
/// cycle.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&mut self) -> Result<TelemetrySnapshot, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Read(format!("{}: {}", self.path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(TelemetrySnapshot::new());
        }

        let value = serde_json::from_str(&content)?;
        snapshot_from_value(value)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "rec1": { "timestamp": 1000, "heart_rate": 70 },
            "rec2": { "timestamp": 2000, "heart_rate": 75 }
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/telemetry.json");
        assert_eq!(source.path(), Path::new("/tmp/telemetry.json"));
        assert_eq!(source.description(), "file: /tmp/telemetry.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("rec1"));
    }

    #[tokio::test]
    async fn test_file_source_rereads_on_every_fetch() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap().len(), 2);
        assert_eq!(source.fetch().await.unwrap().len(), 2);

        file.as_file_mut().set_len(0).unwrap();
        file.rewind().unwrap();
        writeln!(file, r#"{{ "only": {{ "timestamp": 1 }} }}"#).unwrap();
        file.flush().unwrap();

        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("only"));
    }

    #[tokio::test]
    async fn test_file_source_empty_and_null_files() {
        let mut file = NamedTempFile::new().unwrap();
        let mut source = FileSource::new(file.path());
        assert!(source.fetch().await.unwrap().is_empty());

        writeln!(file, "null").unwrap();
        assert!(source.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/telemetry.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Read(_)));
        assert!(err.to_string().contains("Read error"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
