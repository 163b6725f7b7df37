//! Local filesystem storage implementation.
//!
//! All artifacts live flat under one data directory. Writes go through a
//! temporary file that is renamed into place.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{LedgerEntry, Snapshot, Source};
use crate::storage::{LEDGER_FILE, TrackerStorage};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = self.path(&format!("{key}.tmp"));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read bytes of an artifact that must exist.
    async fn read_required(&self, key: &str) -> Result<Vec<u8>> {
        self.read_bytes(key)
            .await?
            .ok_or_else(|| AppError::artifact(self.path(key).display(), "file not found"))
    }

    /// Read JSON data of an artifact that must exist.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let bytes = self.read_required(key).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::artifact(self.path(key).display(), e))
    }
}

#[async_trait]
impl TrackerStorage for LocalStorage {
    async fn load_snapshot(&self, source: Source, previous: bool) -> Result<Snapshot> {
        let key = if previous {
            source.previous_file()
        } else {
            source.current_file()
        };
        self.read_json(&key).await
    }

    async fn load_ledger(&self) -> Result<Vec<LedgerEntry>> {
        self.read_json(LEDGER_FILE).await
    }

    async fn save_ledger(&self, entries: &[LedgerEntry]) -> Result<()> {
        self.write_json(LEDGER_FILE, entries).await
    }

    async fn read_names(&self, key: &str) -> Result<Vec<String>> {
        let bytes = self.read_required(key).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| AppError::artifact(self.path(key).display(), e))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn write_names(&self, key: &str, names: &[String]) -> Result<()> {
        self.write_bytes(key, names.join("\n").as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::storage::LIST_FILE;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!storage.path("test.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let data = storage.read_bytes("nope.txt").await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_load_epochs() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        std::fs::write(
            dir.join("eps_rep.json"),
            r#"{"flake8-a": {"version": "1.1", "summary": "A", "eps": ["AAA"]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("eps_rep.json.old"),
            r#"{"flake8-a": {"version": "1.0", "summary": "A"}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("eps_ext.json"), "{}").unwrap();
        std::fs::write(dir.join("eps_ext.json.old"), "{}").unwrap();

        let storage = LocalStorage::new(dir);
        let epochs = storage.load_epochs().await.unwrap();

        assert_eq!(epochs.rep.current["flake8-a"].version, "1.1");
        assert_eq!(epochs.rep.current["flake8-a"].entry_points, vec!["AAA"]);
        assert_eq!(epochs.rep.previous["flake8-a"].version, "1.0");
        assert!(epochs.get(Source::Ext).is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("eps_rep.json"), "{}").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = storage.load_epochs().await.unwrap_err();
        assert!(matches!(err, AppError::Artifact { .. }));
        assert!(err.to_string().contains("eps_rep.json.old"));
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("eps_ext.json"), "{ not json").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = storage.load_snapshot(Source::Ext, false).await.unwrap_err();
        assert!(matches!(err, AppError::Artifact { .. }));
    }

    #[tokio::test]
    async fn test_ledger_save_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let entries = vec![LedgerEntry {
            timestamp: 1_700_000_000,
            name: "flake8-docstrings".into(),
            version: "1.7.0".into(),
            summary: "Docstring checks".into(),
            status: Status::New,
        }];
        storage.save_ledger(&entries).await.unwrap();

        let loaded = storage.load_ledger().await.unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_names_round_trip_skips_blank_lines() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        std::fs::write(storage.path(LIST_FILE), "flake8\n\n  mccabe \n").unwrap();
        let names = storage.read_names(LIST_FILE).await.unwrap();
        assert_eq!(names, vec!["flake8", "mccabe"]);

        storage.write_names(LIST_FILE, &names).await.unwrap();
        let text = std::fs::read_to_string(storage.path(LIST_FILE)).unwrap();
        assert_eq!(text, "flake8\nmccabe");
    }
}
