#![allow(dead_code)]

use async_trait::async_trait;
use conteggi::remote::{RemoteCounter, RemoteError};
use conteggi::store::{KeyValueStore, MemoryStore};
use conteggi::{EventCounter, EventKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted remote answers reads.
#[derive(Clone, Copy, Debug)]
pub enum ReadOutcome {
    Count(u64),
    Status(u16),
    Malformed,
}

/// A remote whose reads are scripted per key and whose increments are counted.
#[derive(Default)]
pub struct ScriptedRemote {
    reads: Mutex<HashMap<String, ReadOutcome>>,
    increments: AtomicUsize,
    fail_increments: bool,
}

impl ScriptedRemote {
    pub fn failing() -> Self {
        Self {
            fail_increments: true,
            ..Self::default()
        }
    }

    pub fn answer(&self, key: &EventKey, outcome: ReadOutcome) {
        self.reads
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), outcome);
    }

    pub fn increments(&self) -> usize {
        self.increments.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCounter for ScriptedRemote {
    async fn increment(&self, _key: &EventKey) -> Result<(), RemoteError> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        if self.fail_increments {
            Err(RemoteError::Status(500))
        } else {
            Ok(())
        }
    }

    async fn fetch(&self, key: &EventKey) -> Result<u64, RemoteError> {
        let outcome = self.reads.lock().unwrap().get(key.as_str()).copied();
        match outcome {
            Some(ReadOutcome::Count(count)) => Ok(count),
            Some(ReadOutcome::Status(code)) => Err(RemoteError::Status(code)),
            Some(ReadOutcome::Malformed) | None => {
                let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
                Err(RemoteError::Malformed(err))
            }
        }
    }
}

/// A remote whose calls never complete.
pub struct HangingRemote;

#[async_trait]
impl RemoteCounter for HangingRemote {
    async fn increment(&self, _key: &EventKey) -> Result<(), RemoteError> {
        std::future::pending().await
    }

    async fn fetch(&self, _key: &EventKey) -> Result<u64, RemoteError> {
        std::future::pending().await
    }
}

/// A remote that answers every read with `count` after `delay`.
pub struct SlowRemote {
    delay: Duration,
    count: u64,
}

impl SlowRemote {
    pub fn new(delay: Duration, count: u64) -> Self {
        Self { delay, count }
    }
}

#[async_trait]
impl RemoteCounter for SlowRemote {
    async fn increment(&self, _key: &EventKey) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn fetch(&self, _key: &EventKey) -> Result<u64, RemoteError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.count)
    }
}

pub fn counter_with(remote: Arc<dyn RemoteCounter>) -> (Arc<MemoryStore>, EventCounter) {
    let store = Arc::new(MemoryStore::new());
    let counter = EventCounter::new(store.clone(), remote);
    (store, counter)
}

pub fn set_local(store: &MemoryStore, key: &EventKey, value: u64) {
    store
        .set(&format!("mw_sys_metric_{key}"), &value.to_string())
        .unwrap();
}
