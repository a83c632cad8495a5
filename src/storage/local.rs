//! Local filesystem record store.
//!
//! Stands in for the hosted table during development and testing. Each
//! record is a JSON object holding the configured column and a timestamp.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::RecordUpdate;
use crate::storage::RecordStore;

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalRecordStore {
    root_dir: PathBuf,
    column: String,
}

impl LocalRecordStore {
    /// Create a new LocalRecordStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            column: column.into(),
        }
    }

    /// Path of the file backing `record_id`.
    pub fn record_path(&self, record_id: i64) -> PathBuf {
        self.root_dir
            .join("records")
            .join(format!("{record_id}.json"))
    }

    /// Read a record back, returning None if it was never written.
    pub async fn read(&self, record_id: i64) -> Result<Option<serde_json::Value>> {
        let path = self.record_path(record_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn update(&self, record_id: i64, update: &RecordUpdate) -> Result<serde_json::Value> {
        let mut record = serde_json::Map::new();
        record.insert("id".to_string(), json!(record_id));
        record.insert(self.column.clone(), serde_json::to_value(update)?);
        record.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
        let record = serde_json::Value::Object(record);

        let path = self.record_path(record_id);
        self.write_bytes(&path, &serde_json::to_vec_pretty(&record)?)
            .await?;
        log::info!("Record {} written to {}", record_id, path.display());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(corpus: &str) -> RecordUpdate {
        RecordUpdate {
            corpus: corpus.to_string(),
        }
    }

    #[tokio::test]
    async fn writes_record_under_column() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRecordStore::new(dir.path(), "ai");

        let written = store.update(42, &update("refined text")).await.unwrap();
        assert_eq!(written["ai"]["corpus"], "refined text");

        let read = store.read(42).await.unwrap().unwrap();
        assert_eq!(read["id"], 42);
        assert_eq!(read["ai"]["corpus"], "refined text");
        assert!(read["updated_at"].is_string());
    }

    #[tokio::test]
    async fn second_update_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRecordStore::new(dir.path(), "ai");

        store.update(1, &update("old")).await.unwrap();
        store.update(1, &update("new")).await.unwrap();

        let read = store.read(1).await.unwrap().unwrap();
        assert_eq!(read["ai"]["corpus"], "new");
        assert!(!store.record_path(1).with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn missing_record_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRecordStore::new(dir.path(), "ai");
        assert!(store.read(7).await.unwrap().is_none());
    }
}
