//! JSON observer for serializing displayed metrics.
//!
//! # Examples
//!
//! ```rust
//! use conteggi::counters::Observable;
//! use conteggi::dashboard::Panel;
//! use conteggi::keys::EventKey;
//! use conteggi::observers::json::JsonObserver;
//!
//! let loads = Panel::new("SYSTEM_INIT", EventKey::APP_LOADS, "");
//! let clicks = Panel::new("OUTBOUND_SIG", EventKey::PROJECT_CLICKS, "");
//! loads.merge(1000);
//!
//! let metrics: Vec<&dyn Observable> = vec![&loads, &clicks];
//! let json = JsonObserver::new().to_json(metrics.into_iter()).unwrap();
//!
//! assert_eq!(
//!     json,
//!     r#"[{"name":"SYSTEM_INIT","value":1000},{"name":"OUTBOUND_SIG","value":null}]"#
//! );
//! ```

use super::Result;
use crate::counters::Observable;
use crate::snapshot::{current_timestamp_ms, CounterSnapshot, MetricsSnapshot};

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap metrics in a [`MetricsSnapshot`] object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes metrics to JSON.
///
/// Without wrapping, the output is an array of [`CounterSnapshot`]s. With
/// [`wrap_in_snapshot`](JsonObserver::wrap_in_snapshot) it is a
/// [`MetricsSnapshot`] object, optionally timestamped.
///
/// ```rust
/// use conteggi::observers::json::JsonObserver;
///
/// let observer = JsonObserver::new()
///     .wrap_in_snapshot(true)
///     .include_timestamp(true)
///     .pretty(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`MetricsSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Collects metrics into a vector of [`CounterSnapshot`].
    pub fn collect<'a>(
        &self,
        metrics: impl Iterator<Item = &'a dyn Observable>,
    ) -> Vec<CounterSnapshot> {
        metrics.map(CounterSnapshot::from_observable).collect()
    }

    /// Serializes metrics to a JSON string.
    pub fn to_json<'a>(&self, metrics: impl Iterator<Item = &'a dyn Observable>) -> Result<String> {
        let bytes = self.to_json_bytes(metrics)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Serializes metrics to a JSON byte vector.
    pub fn to_json_bytes<'a>(
        &self,
        metrics: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<Vec<u8>> {
        let snapshots = self.collect(metrics);

        let bytes = if self.config.wrap_in_snapshot {
            let snapshot = if self.config.include_timestamp {
                MetricsSnapshot::with_timestamp(snapshots, current_timestamp_ms())
            } else {
                MetricsSnapshot::new(snapshots)
            };
            self.encode(&snapshot)?
        } else {
            self.encode(&snapshots)?
        };
        Ok(bytes)
    }

    fn encode<T: serde::Serialize>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        if self.config.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }
}
