//! Snapshot types for serializing displayed metrics.
//!
//! A [`MetricsSnapshot`] is a point-in-time capture of a set of
//! [`Observable`] metrics, e.g. the dashboard's four panels, in a shape
//! that serializes cleanly:
//!
//! ```json
//! {
//!   "timestamp_ms": 1760659200000,
//!   "counters": [
//!     { "name": "SYSTEM_INIT", "description": "...", "value": 128 },
//!     { "name": "NAV_CYCLE", "description": "...", "value": null }
//!   ]
//! }
//! ```

use crate::counters::Observable;
use serde::{Deserialize, Serialize};

/// A snapshot of a single metric.
///
/// # Examples
///
/// ```rust
/// use conteggi::snapshot::CounterSnapshot;
///
/// let snapshot = CounterSnapshot::new("SYSTEM_INIT", Some(42));
/// let json = serde_json::to_string(&snapshot).unwrap();
/// assert_eq!(json, r#"{"name":"SYSTEM_INIT","value":42}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CounterSnapshot {
    /// The name of the metric.
    pub name: String,
    /// A one-line description, omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The value, `null` if nothing has been observed yet.
    pub value: Option<u64>,
}

impl CounterSnapshot {
    /// Creates a snapshot without description.
    pub fn new(name: impl Into<String>, value: Option<u64>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value,
        }
    }

    /// Creates a snapshot from an observable metric.
    pub fn from_observable(metric: &dyn Observable) -> Self {
        Self {
            name: if metric.name().is_empty() {
                "(unnamed)".to_string()
            } else {
                metric.name().to_string()
            },
            description: metric.description().to_string(),
            value: metric.value().as_option(),
        }
    }
}

/// A collection of metric snapshots taken at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// The metric snapshots.
    pub counters: Vec<CounterSnapshot>,
}

impl MetricsSnapshot {
    /// Creates a new snapshot with the given metrics.
    pub fn new(counters: Vec<CounterSnapshot>) -> Self {
        Self {
            timestamp_ms: None,
            counters,
        }
    }

    /// Creates a new snapshot with metrics and a timestamp.
    pub fn with_timestamp(counters: Vec<CounterSnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            counters,
        }
    }

    /// Finds a metric by name.
    pub fn get(&self, name: &str) -> Option<&CounterSnapshot> {
        self.counters.iter().find(|c| c.name == name)
    }

    /// Collects snapshots from an iterator of observable metrics.
    pub fn collect<'a>(metrics: impl Iterator<Item = &'a dyn Observable>) -> Self {
        Self::new(metrics.map(CounterSnapshot::from_observable).collect())
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
pub(crate) fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Panel;
    use crate::keys::EventKey;

    #[test]
    fn test_from_observable() {
        let panel = Panel::new("OUTBOUND_SIG", EventKey::PROJECT_CLICKS, "Outbound links.");
        panel.merge(100);

        let snapshot = CounterSnapshot::from_observable(&panel);
        assert_eq!(snapshot.name, "OUTBOUND_SIG");
        assert_eq!(snapshot.value, Some(100));
        assert_eq!(snapshot.description, "Outbound links.");
    }

    #[test]
    fn test_from_observable_unnamed_unset() {
        let tracker = Panel::new("", EventKey::APP_LOADS, "");
        let snapshot = CounterSnapshot::from_observable(&tracker);
        assert_eq!(snapshot.name, "(unnamed)");
        assert_eq!(snapshot.value, None);
    }

    #[test]
    fn test_metrics_snapshot_get() {
        let snapshot = MetricsSnapshot::new(vec![
            CounterSnapshot::new("foo", Some(1)),
            CounterSnapshot::new("bar", None),
        ]);
        assert!(snapshot.get("foo").is_some());
        assert_eq!(snapshot.get("bar").unwrap().value, None);
        assert!(snapshot.get("baz").is_none());
    }

    #[test]
    fn test_collect() {
        let a = Panel::new("a", EventKey::APP_LOADS, "");
        let b = Panel::new("b", EventKey::NAV_SWITCHES, "");
        a.merge(10);

        let metrics: Vec<&dyn Observable> = vec![&a, &b];
        let snapshot = MetricsSnapshot::collect(metrics.into_iter());
        assert_eq!(snapshot.counters.len(), 2);
        assert_eq!(snapshot.get("a").unwrap().value, Some(10));
        assert_eq!(snapshot.get("b").unwrap().value, None);
    }

    #[test]
    fn test_serialize_unset_as_null() {
        let json = serde_json::to_string(&CounterSnapshot::new("x", None)).unwrap();
        assert_eq!(json, r#"{"name":"x","value":null}"#);
    }

    #[test]
    fn test_deserialize_metrics_snapshot() {
        let json = r#"{"timestamp_ms":1234567890,"counters":[{"name":"a","description":"d","value":1}]}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.timestamp_ms, Some(1234567890));
        assert_eq!(snapshot.counters[0].description, "d");
    }

    #[test]
    fn test_timestamp_is_recent() {
        assert!(current_timestamp_ms() > 1_600_000_000_000);
    }
}
