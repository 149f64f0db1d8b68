//! Configuration for the event counter and the diagnostics dashboard.
//!
//! Both configuration types carry the application's defaults and can be
//! adjusted with chainable builder methods or loaded from a JSON file, where
//! every field is optional:
//!
//! ```json
//! {
//!   "counter": { "namespace": "staging_portfolio", "request_timeout_ms": 3000 },
//!   "dashboard": { "poll_interval_ms": 10000 }
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use conteggi::config::CounterConfig;
//! use std::time::Duration;
//!
//! let config = CounterConfig::default()
//!     .with_namespace("staging_portfolio")
//!     .with_request_timeout(Duration::from_secs(3));
//!
//! assert_eq!(config.base_url, "https://api.counterapi.dev/v1");
//! assert_eq!(config.namespace, "staging_portfolio");
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Base URL of the public counter service.
pub const DEFAULT_BASE_URL: &str = "https://api.counterapi.dev/v1";

/// Namespace identifying this application's counters on the remote service.
pub const DEFAULT_NAMESPACE: &str = "matthew_wesney_portfolio_v1";

/// Prefix applied to every key written to the local store.
pub const DEFAULT_LOCAL_PREFIX: &str = "mw_sys_metric_";

/// Number of notifications a subscription may fall behind before skipping.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Interval between two dashboard polls of the read path.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Number of lines kept in the dashboard activity log.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 8;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid JSON or has fields of the wrong type.
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings of the [`EventCounter`](crate::tracker::EventCounter).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Base URL of the remote counting service, without trailing slash.
    pub base_url: String,
    /// Namespace of this application's counters on the remote service.
    pub namespace: String,
    /// Prefix for keys in the local store.
    pub local_prefix: String,
    /// Capacity of the notification bus.
    pub bus_capacity: usize,
    /// Optional per-request timeout in milliseconds. `None` never times out.
    pub request_timeout_ms: Option<u64>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            local_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            request_timeout_ms: None,
        }
    }
}

impl CounterConfig {
    /// Sets the base URL of the remote service.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the remote namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the local key prefix.
    pub fn with_local_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.local_prefix = prefix.into();
        self
    }

    /// Sets the notification bus capacity. Values less than 1 are treated as 1.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity.max(1);
        self
    }

    /// Sets a per-request timeout for remote calls.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(saturating_millis(timeout));
        self
    }

    /// Returns the request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Settings of the [`Dashboard`](crate::dashboard::Dashboard).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Milliseconds between two polls of the read path.
    pub poll_interval_ms: u64,
    /// Number of activity log lines retained.
    pub activity_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: saturating_millis(DEFAULT_POLL_INTERVAL),
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

impl DashboardConfig {
    /// Sets the polling interval. Zero is raised to one millisecond.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = saturating_millis(interval).max(1);
        self
    }

    /// Sets the activity log capacity.
    pub fn with_activity_capacity(mut self, capacity: usize) -> Self {
        self.activity_capacity = capacity;
        self
    }

    /// Returns the polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Whole milliseconds in `duration`, clamped to `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Combined configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Counter settings.
    pub counter: CounterConfig,
    /// Dashboard settings.
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
