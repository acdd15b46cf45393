//! Record stores addressed by `/`-separated key paths.
//!
//! A write replaces whatever value lived at the path; nothing is appended.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Destination for extraction results.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Overwrite the value at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;
}

/// Non-empty segments of a key path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Replace the value at `path` inside `document`.
///
/// Missing intermediate objects are created; non-object intermediates are
/// replaced by objects. An empty path replaces the whole document.
pub fn set_at_path(document: &mut Value, path: &str, value: Value) {
    let mut current = document;

    for segment in segments(path) {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = &mut current[segment];
    }

    *current = value;
}

/// Value at `path` inside `document`, if any.
pub fn get_at_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(document, |current, segment| current.get(segment))
}
