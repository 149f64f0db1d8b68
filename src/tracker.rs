//! The event counter: local durable counts, remote aggregates, and the
//! reconciled read path.
//!
//! # Architecture
//!
//! ```text
//!   record_event(key)
//!        │
//!        ├─► LocalCounters::increment ──► KeyValueStore    (synchronous)
//!        ├─► MetricBus::publish ───────► Subscriptions     (synchronous)
//!        └─► tokio::spawn ─────────────► RemoteCounter::increment
//!                                           (detached, result discarded)
//!
//!   read_metric(key) = max(RemoteCounter::fetch or 0, LocalCounters::read)
//! ```
//!
//! The observed value never goes below what either source has seen: when
//! the remote service lags or is unreachable, the local count wins; when
//! other clients have pushed the remote aggregate ahead, the remote count
//! wins.

use crate::bus::{MetricBus, MetricUpdate, Subscription};
use crate::config::CounterConfig;
use crate::keys::EventKey;
use crate::remote::{HttpRemote, RemoteCounter, RemoteError};
use crate::store::{KeyValueStore, LocalCounters};
use log::{debug, warn};
use std::fmt::{self, Debug};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Records events and reads their best-known totals.
///
/// Neither operation ever fails: storage and network problems are logged
/// and replaced by `0`.
///
/// # Examples
///
/// ```rust
/// use conteggi::keys::EventKey;
/// use conteggi::store::MemoryStore;
/// use conteggi::tracker::EventCounter;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let counter = EventCounter::connect(Arc::new(MemoryStore::new()), Default::default()).unwrap();
/// let mut updates = counter.subscribe();
///
/// assert_eq!(counter.record_event(&EventKey::NAV_SWITCHES), 1);
/// assert_eq!(updates.try_recv().unwrap().value, 1);
/// assert_eq!(counter.read_local(&EventKey::NAV_SWITCHES), 1);
/// # }
/// ```
pub struct EventCounter {
    local: LocalCounters,
    remote: Arc<dyn RemoteCounter>,
    bus: MetricBus,
}

impl EventCounter {
    /// Creates a counter with the default configuration.
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteCounter>) -> Self {
        Self::with_config(store, remote, &CounterConfig::default())
    }

    /// Creates a counter using the local prefix and bus capacity of `config`.
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteCounter>,
        config: &CounterConfig,
    ) -> Self {
        Self {
            local: LocalCounters::new(store, config.local_prefix.clone()),
            remote,
            bus: MetricBus::new(config.bus_capacity),
        }
    }

    /// Creates a counter talking to the HTTP service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn connect(store: Arc<dyn KeyValueStore>, config: CounterConfig) -> Result<Self, RemoteError> {
        let remote = HttpRemote::new(&config)?;
        Ok(Self::with_config(store, Arc::new(remote), &config))
    }

    /// Records one occurrence of `key` and returns the new local value.
    ///
    /// The local store is updated and the [`MetricUpdate`] is broadcast
    /// before this method returns. The remote increment is spawned on the
    /// current Tokio runtime and never awaited; outside a runtime it is
    /// skipped.
    pub fn record_event(&self, key: &EventKey) -> u64 {
        let value = self.local.increment(key);
        self.bus.publish(MetricUpdate::new(key.clone(), value));
        self.spawn_remote_increment(key);
        value
    }

    /// Returns `max(remote, local)` for `key`.
    ///
    /// A failed remote read counts as `0`.
    pub async fn read_metric(&self, key: &EventKey) -> u64 {
        let remote = match self.remote.fetch(key).await {
            Ok(count) => count,
            Err(e) => {
                debug!("conteggi: remote read of '{key}' failed: {e}");
                0
            }
        };
        let local = self.local.read(key);
        remote.max(local)
    }

    /// Returns the local component of `key` alone.
    pub fn read_local(&self, key: &EventKey) -> u64 {
        self.local.read(key)
    }

    /// Registers a subscription for local increments.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Returns the notification bus.
    pub fn bus(&self) -> &MetricBus {
        &self.bus
    }

    /// Returns the local counter layer.
    pub fn local(&self) -> &LocalCounters {
        &self.local
    }

    fn spawn_remote_increment(&self, key: &EventKey) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("conteggi: no async runtime, skipping remote increment of '{key}'");
                return;
            }
        };

        let remote = Arc::clone(&self.remote);
        let key = key.clone();
        handle.spawn(async move {
            if let Err(e) = remote.increment(&key).await {
                warn!("conteggi: remote increment of '{key}' failed: {e}");
            }
        });
    }
}

impl Debug for EventCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCounter")
            .field("local", &self.local)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
