//! Background dashboard task against remotes that are slow or never answer.

mod common;

use common::{counter_with, HangingRemote, SlowRemote};
use conteggi::counters::Observable;
use conteggi::dashboard::Dashboard;
use conteggi::remote::RemoteCounter;
use conteggi::{EventCounter, EventKey};
use std::sync::Arc;
use std::time::Duration;

const SYNCED: &str = "SYNC_COMPLETE: REMOTE_ORIGIN";

fn dashboard_over(remote: Arc<dyn RemoteCounter>) -> (Arc<EventCounter>, Arc<Dashboard>) {
    let (_, counter) = counter_with(remote);
    let counter = Arc::new(counter);
    let dashboard = Arc::new(Dashboard::new(Arc::clone(&counter)));
    (counter, dashboard)
}

#[tokio::test(start_paused = true)]
async fn test_updates_apply_while_remote_hangs() {
    let (counter, dashboard) = dashboard_over(Arc::new(HangingRemote));
    let handle = dashboard.spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(counter.record_event(&EventKey::APP_LOADS), 1);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let panel = dashboard.panel(&EventKey::APP_LOADS).unwrap();
    assert_eq!(panel.displayed(), Some(1));
    assert!(dashboard.activity()[0].ends_with("EVENT_CAPTURED: APP_LOADS >> VAL:1"));

    // many poll intervals pass while the first sync is still stuck
    counter.record_event(&EventKey::APP_LOADS);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(panel.displayed(), Some(2));
    assert!(handle.is_running());

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_updates_apply_during_slow_sync() {
    // reads take longer than the 5s poll interval
    let remote = Arc::new(SlowRemote::new(Duration::from_secs(12), 30));
    let (counter, dashboard) = dashboard_over(remote);
    let handle = dashboard.spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;

    counter.record_event(&EventKey::NAV_SWITCHES);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(dashboard.panel(&EventKey::NAV_SWITCHES).unwrap().displayed(), Some(1));
    assert_eq!(dashboard.panel(&EventKey::APP_LOADS).unwrap().displayed(), None);

    // the first sync lands at 12s; the ticks at 5s and 10s were skipped
    tokio::time::sleep(Duration::from_secs(13)).await;
    assert_eq!(dashboard.panel(&EventKey::APP_LOADS).unwrap().displayed(), Some(30));
    assert_eq!(dashboard.panel(&EventKey::NAV_SWITCHES).unwrap().displayed(), Some(30));
    assert!(!dashboard.activity().iter().any(|l| l.ends_with(SYNCED)));

    // the tick at 15s starts the second sync, which completes at 27s
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert!(dashboard.activity()[0].ends_with(SYNCED));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_running_sync() {
    let remote = Arc::new(SlowRemote::new(Duration::from_secs(12), 30));
    let (_, dashboard) = dashboard_over(remote);
    let handle = dashboard.spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;

    handle.stop().await;
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert!(dashboard.panels().all(|p| p.value().is_unset()));
}
