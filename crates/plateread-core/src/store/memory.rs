//! In-process record store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

use super::{get_at_path, set_at_path, RecordStore};

/// Keeps records in a JSON tree held in memory.
#[derive(Debug)]
pub struct MemoryStore {
    document: Mutex<Value>,
    writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            document: Mutex::new(Value::Object(Map::new())),
            writes: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value currently stored at `path`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let document = self.document.lock().ok()?;
        get_at_path(&document, path).cloned()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut document = self.document.lock().map_err(|_| StoreError::Write {
            path: path.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;

        set_at_path(&mut document, path, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
