//! Diagnostics dashboard over the event counter.
//!
//! The dashboard shows one [`Panel`] per recognized event key and keeps it
//! current from two sources:
//!
//! - a periodic poll of [`EventCounter::read_metric`], which picks up
//!   increments made by *other* clients (every 5 seconds by default);
//! - the notification bus, which delivers this client's own increments
//!   immediately.
//!
//! The two sources race, so every panel merges with "keep the larger of the
//! displayed and the newly read value": a poll that returns before the
//! remote service has seen a local increment never pulls the panel back.
//!
//! # Examples
//!
//! ```rust
//! use conteggi::bus::MetricUpdate;
//! use conteggi::dashboard::Dashboard;
//! use conteggi::keys::EventKey;
//! use conteggi::store::MemoryStore;
//! use conteggi::tracker::EventCounter;
//! use std::sync::Arc;
//!
//! let counter = EventCounter::connect(Arc::new(MemoryStore::new()), Default::default()).unwrap();
//! let dashboard = Dashboard::new(Arc::new(counter));
//!
//! dashboard.apply_update(&MetricUpdate::new(EventKey::NAV_SWITCHES, 7));
//! dashboard.apply_update(&MetricUpdate::new(EventKey::NAV_SWITCHES, 5));
//!
//! let panel = dashboard.panel(&EventKey::NAV_SWITCHES).unwrap();
//! assert_eq!(panel.displayed(), Some(7));
//! assert!(dashboard.activity()[0].ends_with("EVENT_CAPTURED: NAV_SWITCHES >> VAL:5"));
//! ```

use crate::bus::MetricUpdate;
use crate::config::DashboardConfig;
use crate::counters::maximum::Maximum;
use crate::counters::{CounterValue, Observable};
use crate::keys::EventKey;
use crate::snapshot::{current_timestamp_ms, CounterSnapshot, MetricsSnapshot};
use crate::tracker::EventCounter;
use log::{debug, warn};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

const LOG_CONNECTING: &str = "ESTABLISHING SECURE CONNECTION...";
const LOG_SUBSCRIBED: &str = "SUBSCRIPTION_ACTIVE: METRIC_STREAM_V1";
const LOG_SYNCED: &str = "SYNC_COMPLETE: REMOTE_ORIGIN";

/// One labelled metric on the dashboard.
#[derive(Debug)]
pub struct Panel {
    label: &'static str,
    key: EventKey,
    description: &'static str,
    shown: Maximum,
}

impl Panel {
    /// Creates a panel showing nothing until its first merge.
    pub const fn new(label: &'static str, key: EventKey, description: &'static str) -> Self {
        Self {
            label,
            key,
            description,
            shown: Maximum::new(),
        }
    }

    /// The four panels of the application dashboard.
    pub fn defaults() -> Vec<Panel> {
        vec![
            Panel::new(
                "SYSTEM_INIT",
                EventKey::APP_LOADS,
                "Total application initialization sequences.",
            ),
            Panel::new(
                "NAV_CYCLE",
                EventKey::NAV_SWITCHES,
                "Internal routing events and tab switches.",
            ),
            Panel::new(
                "OUTBOUND_SIG",
                EventKey::PROJECT_CLICKS,
                "External link actuations via project cards.",
            ),
            Panel::new(
                "STREAM_OPS",
                EventKey::STREAM_INTERACTIONS,
                "Asset stream view events and lightboxes.",
            ),
        ]
    }

    /// The event key this panel shows.
    pub fn key(&self) -> &EventKey {
        &self.key
    }

    /// The short label of this panel.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The displayed value, or `None` before the first merge.
    pub fn displayed(&self) -> Option<u64> {
        self.shown.get()
    }

    /// Merges a newly observed value, keeping the larger one.
    pub fn merge(&self, value: u64) {
        self.shown.observe(value);
    }
}

impl Observable for Panel {
    fn name(&self) -> &str {
        self.label
    }

    fn value(&self) -> CounterValue {
        self.shown.value()
    }

    fn description(&self) -> &str {
        self.description
    }
}

/// Live view of the event counters.
///
/// All methods take `&self`; a dashboard is typically shared in an `Arc`
/// between the UI and its background task (see [`Dashboard::spawn`]).
#[derive(Debug)]
pub struct Dashboard {
    counter: Arc<EventCounter>,
    panels: Vec<Panel>,
    config: DashboardConfig,
    activity: Mutex<VecDeque<String>>,
    // 0 until the first sync starts
    last_sync_ms: AtomicU64,
    synced_once: AtomicBool,
}

impl Dashboard {
    /// Creates the default four-panel dashboard with default settings.
    pub fn new(counter: Arc<EventCounter>) -> Self {
        Self::with_config(counter, DashboardConfig::default())
    }

    /// Creates the default four-panel dashboard.
    pub fn with_config(counter: Arc<EventCounter>, config: DashboardConfig) -> Self {
        Self::with_panels(counter, Panel::defaults(), config)
    }

    /// Creates a dashboard with custom panels.
    pub fn with_panels(
        counter: Arc<EventCounter>,
        panels: Vec<Panel>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            counter,
            panels,
            activity: Mutex::new(VecDeque::with_capacity(config.activity_capacity)),
            config,
            last_sync_ms: AtomicU64::new(0),
            synced_once: AtomicBool::new(false),
        }
    }

    /// Iterates over the panels as observable metrics.
    pub fn panels(&self) -> impl Iterator<Item = &dyn Observable> + '_ {
        self.panels.iter().map(|p| p as &dyn Observable)
    }

    /// Returns the panel showing `key`, if any.
    pub fn panel(&self, key: &EventKey) -> Option<&Panel> {
        self.panels.iter().find(|p| p.key() == key)
    }

    /// Applies a bus notification.
    ///
    /// Returns `false` if no panel shows the update's key; such updates are
    /// ignored and not logged.
    pub fn apply_update(&self, update: &MetricUpdate) -> bool {
        let Some(panel) = self.panel(&update.key) else {
            return false;
        };
        panel.merge(update.value);
        self.record_activity(format!(
            "EVENT_CAPTURED: {} >> VAL:{}",
            update.key.short_name(),
            update.value
        ));
        true
    }

    /// Reads every panel's metric and merges the results.
    ///
    /// Reads run concurrently. Every sync after the first one is logged.
    pub async fn sync(&self) {
        self.last_sync_ms
            .store(current_timestamp_ms(), Ordering::Relaxed);

        let mut reads = JoinSet::new();
        for panel in &self.panels {
            let counter = Arc::clone(&self.counter);
            let key = panel.key().clone();
            reads.spawn(async move {
                let count = counter.read_metric(&key).await;
                (key, count)
            });
        }

        while let Some(result) = reads.join_next().await {
            match result {
                Ok((key, count)) => {
                    if let Some(panel) = self.panel(&key) {
                        panel.merge(count);
                    }
                }
                Err(e) => warn!("conteggi: dashboard read task failed: {e}"),
            }
        }

        if self.synced_once.swap(true, Ordering::Relaxed) {
            self.record_activity(LOG_SYNCED);
        }
        debug!("conteggi: dashboard synced {} panel(s)", self.panels.len());
    }

    /// Appends a time-stamped line to the activity log, evicting the oldest
    /// line once the configured capacity is reached.
    pub fn record_activity(&self, message: impl AsRef<str>) {
        if self.config.activity_capacity == 0 {
            return;
        }
        let line = format!("[{}] {}", clock_stamp(current_timestamp_ms()), message.as_ref());
        let mut activity = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        activity.push_front(line);
        activity.truncate(self.config.activity_capacity);
    }

    /// Returns the activity log, newest line first.
    pub fn activity(&self) -> Vec<String> {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Milliseconds since Unix epoch at which the last sync started.
    pub fn last_sync_ms(&self) -> Option<u64> {
        match self.last_sync_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(ms),
        }
    }

    /// Captures the panels, stamped with the last sync time.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.panels().map(CounterSnapshot::from_observable).collect();
        match self.last_sync_ms() {
            Some(ms) => MetricsSnapshot::with_timestamp(counters, ms),
            None => MetricsSnapshot::new(counters),
        }
    }

    /// Starts the background task keeping this dashboard current.
    ///
    /// The task subscribes to the bus before it starts, syncs immediately,
    /// then syncs on every poll interval. Bus updates are applied as they
    /// arrive, also while a sync is waiting on the remote service. A tick
    /// that fires while the previous sync is still running is skipped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(self: &Arc<Self>) -> DashboardHandle {
        let dashboard = Arc::clone(self);
        let mut updates = dashboard.counter.subscribe();

        let task = tokio::spawn(async move {
            dashboard.record_activity(LOG_CONNECTING);
            dashboard.record_activity(LOG_SUBSCRIBED);

            let mut ticker = tokio::time::interval(dashboard.config.poll_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight: Option<Pin<Box<dyn Future<Output = ()> + Send + '_>>> = None;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if in_flight.is_none() {
                            in_flight = Some(Box::pin(dashboard.sync()));
                        } else {
                            debug!("conteggi: previous dashboard sync still running, skipping tick");
                        }
                    }
                    _ = async {
                        if let Some(sync) = in_flight.as_mut() {
                            sync.await;
                        }
                    }, if in_flight.is_some() => {
                        in_flight = None;
                    }
                    update = updates.recv() => match update {
                        Some(update) => {
                            dashboard.apply_update(&update);
                        }
                        None => break,
                    },
                }
            }
        });

        DashboardHandle { task: Some(task) }
    }
}

/// Controls the background task started by [`Dashboard::spawn`].
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct DashboardHandle {
    task: Option<JoinHandle<()>>,
}

impl DashboardHandle {
    /// Stops the task and waits until it has exited.
    ///
    /// Once this returns, the dashboard receives no further updates.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("conteggi: dashboard task failed: {e}");
                }
            }
        }
    }

    /// Returns `true` while the task is running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Formats the UTC time of day of `ms` as `HH:MM:SS.mmm`.
fn clock_stamp(ms: u64) -> String {
    let millis = ms % 1000;
    let secs = (ms / 1000) % 86_400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        millis
    )
}
