//! # Conteggi - Event Counters with Local and Remote Totals
//!
//! A Rust library that counts a small, fixed set of application events.
//! Each count lives in two places:
//!
//! - a **local counter** in a durable key-value store on the client, updated
//!   synchronously and owned by this client alone;
//! - a **remote counter** on a shared HTTP counting service, incremented by
//!   every client instance, best effort.
//!
//! Reads reconcile the two conservatively by returning `max(local, remote)`,
//! so a displayed count never goes backwards just because the remote
//! service is lagging or unreachable.
//!
//! ## Design Principles
//!
//! 1. **Never fail the caller**: every storage or network failure has a
//!    fallback value (`0`) and is only logged through the [`log`] facade.
//!
//! 2. **Never block on the network**: [`record_event`](tracker::EventCounter::record_event)
//!    updates the local store and notifies subscribers synchronously, then
//!    spawns the remote increment as a detached Tokio task.
//!
//! 3. **Instant local feedback**: every local increment is broadcast on the
//!    [`bus`] so views can update without waiting for their next poll.
//!
//! 4. **One place for namespacing**: only [`store::LocalCounters`] builds
//!    storage keys, and stores are swappable behind [`store::KeyValueStore`].
//!
//! ## Event Keys
//!
//! | Key | Wire name | Dashboard panel |
//! |-----|-----------|-----------------|
//! | [`EventKey::APP_LOADS`](keys::EventKey::APP_LOADS) | `global_app_loads` | `SYSTEM_INIT` |
//! | [`EventKey::NAV_SWITCHES`](keys::EventKey::NAV_SWITCHES) | `global_nav_switches` | `NAV_CYCLE` |
//! | [`EventKey::PROJECT_CLICKS`](keys::EventKey::PROJECT_CLICKS) | `global_project_clicks` | `OUTBOUND_SIG` |
//! | [`EventKey::STREAM_INTERACTIONS`](keys::EventKey::STREAM_INTERACTIONS) | `global_stream_views` | `STREAM_OPS` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conteggi::config::CounterConfig;
//! use conteggi::keys::EventKey;
//! use conteggi::store::FileStore;
//! use conteggi::tracker::EventCounter;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FileStore::open("metrics.json")?);
//! let counter = EventCounter::connect(store, CounterConfig::default())?;
//!
//! // Synchronous local update + notification, remote sync in the background
//! counter.record_event(&EventKey::APP_LOADS);
//!
//! // max(remote, local), never an error
//! println!("app loads: {}", counter.read_metric(&EventKey::APP_LOADS).await);
//! # Ok(())
//! # }
//! ```
//!
//! ## Dashboard and Observers
//!
//! [`dashboard::Dashboard`] polls the read path and listens to the bus,
//! merging both with "keep the larger value". Its panels implement
//! [`counters::Observable`] and can be exported with the [`observers`]:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | (always) | [`observers::json`] | Serialize panels to JSON |
//! | `table` | `observers::table` | Pretty-print panels as ASCII tables |
//! | `full` | All observers | Enables all observer modules |

pub mod bus;
pub mod config;
pub mod counters;
pub mod dashboard;
pub mod keys;
pub mod observers;
pub mod remote;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use bus::{MetricBus, MetricUpdate, Subscription};
pub use keys::EventKey;
pub use tracker::EventCounter;
