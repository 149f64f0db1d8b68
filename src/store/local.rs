//! Local counter values on top of a [`KeyValueStore`].

use super::KeyValueStore;
use crate::keys::EventKey;
use log::{debug, warn};
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex, PoisonError};

/// The local component of every event counter.
///
/// Values are stored as base-10 strings under `prefix + key`. A missing,
/// unparseable or unreadable entry counts as `0`; no method here ever fails.
///
/// The read-modify-write of [`increment`](LocalCounters::increment) runs
/// under a mutex, so concurrent increments from several threads of the same
/// process never lose an update. Writers in other processes sharing the
/// same store are not coordinated.
///
/// # Examples
///
/// ```rust
/// use conteggi::keys::EventKey;
/// use conteggi::store::{KeyValueStore, LocalCounters, MemoryStore};
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let local = LocalCounters::new(store.clone(), "app_");
///
/// assert_eq!(local.increment(&EventKey::APP_LOADS), 1);
/// assert_eq!(local.increment(&EventKey::APP_LOADS), 2);
/// assert_eq!(store.get("app_global_app_loads").unwrap().as_deref(), Some("2"));
/// ```
pub struct LocalCounters {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    write_lock: Mutex<()>,
}

impl LocalCounters {
    /// Creates the local counter layer over `store` using `prefix`.
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the namespaced storage key for `key`.
    pub fn storage_key(&self, key: &EventKey) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Returns the prefix applied to every storage key.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Reads the local value of `key`, substituting `0` on any failure.
    pub fn read(&self, key: &EventKey) -> u64 {
        let storage_key = self.storage_key(key);
        match self.store.get(&storage_key) {
            Ok(Some(raw)) => parse_count(&raw).unwrap_or_else(|| {
                debug!("conteggi: ignoring unparseable local value {raw:?} for '{storage_key}'");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                debug!("conteggi: local read of '{storage_key}' failed: {e}");
                0
            }
        }
    }

    /// Increments the local value of `key` and returns the new value.
    ///
    /// The returned value is computed in memory; if the store rejects the
    /// write, the failure is logged and the value is returned anyway.
    pub fn increment(&self, key: &EventKey) -> u64 {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let value = self.read(key).saturating_add(1);
        let storage_key = self.storage_key(key);
        if let Err(e) = self.store.set(&storage_key, &value.to_string()) {
            warn!("conteggi: local write of '{storage_key}' failed: {e}");
        }
        value
    }
}

impl Debug for LocalCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCounters")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Parses a stored counter value.
///
/// Leading and trailing whitespace is ignored. Negative numbers and any
/// other text yield `None`.
fn parse_count(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}
