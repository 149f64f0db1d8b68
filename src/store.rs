//! Durable local key-value storage.
//!
//! The event counter keeps its local component in a flat `key -> string`
//! store. This module defines the [`KeyValueStore`] seam and three
//! implementations:
//!
//! | Store | Description |
//! |-------|-------------|
//! | [`MemoryStore`] | In-process map, lost when the process exits |
//! | [`FileStore`] | A single JSON object file, written atomically |
//! | [`DisabledStore`] | Every call fails, like storage in a privacy-mode browser |
//!
//! [`LocalCounters`] sits on top of a store and owns the namespacing and
//! parsing rules, so no other module ever builds a storage key.

mod file;
mod local;

pub use file::FileStore;
pub use local::LocalCounters;

use std::collections::HashMap;
use std::io;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store io error: {0}")]
    Io(#[from] io::Error),

    /// The backing file could not be encoded.
    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refuses all access.
    #[error("store unavailable")]
    Unavailable,
}

/// A flat string-to-string store shared by everything in the process.
///
/// Writes are last-write-wins; there is no transaction discipline.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// An in-memory [`KeyValueStore`].
///
/// # Examples
///
/// ```rust
/// use conteggi::store::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("theme", "dark").unwrap();
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
/// assert_eq!(store.get("missing").unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A [`KeyValueStore`] that rejects every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_disabled_store() {
        let store = DisabledStore;
        assert!(matches!(store.get("a"), Err(StoreError::Unavailable)));
        assert!(matches!(store.set("a", "1"), Err(StoreError::Unavailable)));
    }

    #[test]
    fn test_store_is_object_safe() {
        let stores: Vec<Box<dyn KeyValueStore>> =
            vec![Box::new(MemoryStore::new()), Box::new(DisabledStore)];
        assert!(stores[0].get("x").unwrap().is_none());
        assert!(stores[1].get("x").is_err());
    }
}
