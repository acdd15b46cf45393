//! Record store backed by a single JSON document on disk.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

use super::{set_at_path, RecordStore};

/// Stores records in one JSON file, rewritten atomically on every write.
///
/// File access runs on the blocking pool; the async lock serializes writers
/// so two updates never read the same base document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document; a missing or empty file is `{}`.
    pub fn load(&self) -> Result<Value, StoreError> {
        load_document(&self.path)
    }
}

fn load_document(path: &Path) -> Result<Value, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(write_error(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn persist_document(path: &Path, document: &Value) -> Result<(), StoreError> {
    let content = serde_json::to_vec_pretty(document)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_error(path, e))?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    file.write_all(&content).map_err(|e| write_error(path, e))?;
    file.persist(path).map_err(|e| write_error(path, e.error))?;

    Ok(())
}

fn write_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn set(&self, record_path: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        let key = record_path.to_string();
        tokio::task::spawn_blocking(move || {
            let mut document = load_document(&path)?;
            set_at_path(&mut document, &key, value);
            persist_document(&path, &document)
        })
        .await
        .map_err(|e| StoreError::Write {
            path: self.path.display().to_string(),
            reason: format!("write task failed: {}", e),
        })??;

        debug!("Wrote record {} to {}", record_path, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/records.json"));

        store.set("images/mostRecent", json!({"text": {"brand": "EATON"}})).await.unwrap();

        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(doc, json!({"images": {"mostRecent": {"text": {"brand": "EATON"}}}}));
    }

    #[tokio::test]
    async fn test_set_overwrites_record_keeps_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, r#"{"images": {"mostRecent": {"old": 1}}, "audit": [1]}"#).unwrap();

        let store = JsonFileStore::new(&path);
        store.set("images/mostRecent", json!({"new": 2})).await.unwrap();

        assert_eq!(
            store.load().unwrap(),
            json!({"images": {"mostRecent": {"new": 2}}, "audit": [1]})
        );
    }

    #[tokio::test]
    async fn test_corrupt_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let result = store.set("images/mostRecent", json!(1)).await;

        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_concurrent_writers_keep_both_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::new(dir.path().join("records.json")));

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.set("plates/a", json!(1)).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.set("plates/b", json!(2)).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.load().unwrap(), json!({"plates": {"a": 1, "b": 2}}));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert_eq!(store.load().unwrap(), json!({}));
    }
}
