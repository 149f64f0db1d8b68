//! In-process notification bus for local counter increments.
//!
//! Every [`record_event`](crate::tracker::EventCounter::record_event)
//! broadcasts one [`MetricUpdate`] on the [`METRIC_UPDATE_TOPIC`] topic.
//! Components that want to react immediately (instead of waiting for their
//! next poll) hold a [`Subscription`].
//!
//! Subscriptions are a capability, not a queue: updates published before
//! [`MetricBus::subscribe`] are never replayed. Dropping a subscription, or
//! calling [`Subscription::unsubscribe`], stops delivery.
//!
//! # Examples
//!
//! ```rust
//! use conteggi::bus::{MetricBus, MetricUpdate};
//! use conteggi::keys::EventKey;
//!
//! let bus = MetricBus::new(16);
//! let mut first = bus.subscribe();
//! let mut second = bus.subscribe();
//!
//! bus.publish(MetricUpdate::new(EventKey::APP_LOADS, 3));
//!
//! assert_eq!(first.try_recv().unwrap().value, 3);
//! assert_eq!(second.try_recv().unwrap().value, 3);
//! assert!(first.try_recv().is_none());
//! ```

use crate::keys::EventKey;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Name of the topic carrying [`MetricUpdate`]s.
pub const METRIC_UPDATE_TOPIC: &str = "metric-update";

/// Payload broadcast after a local increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricUpdate {
    /// The event key that was recorded.
    pub key: EventKey,
    /// The local counter value after the increment.
    pub value: u64,
}

impl MetricUpdate {
    /// Creates an update.
    pub fn new(key: EventKey, value: u64) -> Self {
        Self { key, value }
    }
}

/// A process-scoped publish/subscribe registry for [`MetricUpdate`]s.
///
/// Cloning a bus yields another handle to the same topic.
#[derive(Debug, Clone)]
pub struct MetricBus {
    tx: broadcast::Sender<MetricUpdate>,
}

impl MetricBus {
    /// Creates a bus whose subscriptions may fall `capacity` updates behind
    /// before older updates are skipped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns the topic name.
    pub fn topic(&self) -> &'static str {
        METRIC_UPDATE_TOPIC
    }

    /// Registers a new subscription.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Broadcasts `update` to every live subscription.
    ///
    /// Returns the number of subscriptions the update was delivered to.
    /// Having no subscribers is not an error.
    pub fn publish(&self, update: MetricUpdate) -> usize {
        match self.tx.send(update) {
            Ok(receivers) => {
                trace!("conteggi: {METRIC_UPDATE_TOPIC} delivered to {receivers} subscriber(s)");
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MetricBus {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BUS_CAPACITY)
    }
}

/// A live registration on a [`MetricBus`].
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<MetricUpdate>,
}

impl Subscription {
    /// Waits for the next update.
    ///
    /// Returns `None` once every bus handle has been dropped. If this
    /// subscription fell behind, the overwritten updates are skipped.
    pub async fn recv(&mut self) -> Option<MetricUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) => return Some(update),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("conteggi: subscription lagged, skipped {skipped} update(s)");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next pending update without waiting.
    pub fn try_recv(&mut self) -> Option<MetricUpdate> {
        loop {
            match self.rx.try_recv() {
                Ok(update) => return Some(update),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("conteggi: subscription lagged, skipped {skipped} update(s)");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Deregisters this subscription.
    ///
    /// Equivalent to dropping it; spelled out for call sites tearing down a
    /// view.
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = MetricBus::new(4);
        assert_eq!(bus.publish(MetricUpdate::new(EventKey::APP_LOADS, 1)), 0);
    }

    #[test]
    fn test_no_replay_before_subscribe() {
        let bus = MetricBus::new(4);
        bus.publish(MetricUpdate::new(EventKey::APP_LOADS, 1));
        let mut sub = bus.subscribe();
        assert!(sub.try_recv().is_none());
        bus.publish(MetricUpdate::new(EventKey::APP_LOADS, 2));
        assert_eq!(sub.try_recv().unwrap().value, 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = MetricBus::new(4);
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        dropped.unsubscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(MetricUpdate::new(EventKey::NAV_SWITCHES, 1)), 1);
        drop(kept);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_lagging_subscription_skips_oldest() {
        let bus = MetricBus::new(2);
        let mut sub = bus.subscribe();
        for value in 1..=5 {
            bus.publish(MetricUpdate::new(EventKey::APP_LOADS, value));
        }
        assert_eq!(sub.try_recv().unwrap().value, 4);
        assert_eq!(sub.try_recv().unwrap().value, 5);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_string(&MetricUpdate::new(EventKey::PROJECT_CLICKS, 9)).unwrap();
        assert_eq!(json, r#"{"key":"global_project_clicks","value":9}"#);
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_bus_dropped() {
        let bus = MetricBus::new(4);
        let mut sub = bus.subscribe();
        bus.publish(MetricUpdate::new(EventKey::APP_LOADS, 1));
        drop(bus);
        assert_eq!(sub.recv().await.unwrap().value, 1);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn test_topic_name() {
        assert_eq!(MetricBus::default().topic(), "metric-update");
    }
}
