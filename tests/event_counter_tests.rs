mod common;

use common::{counter_with, set_local, HangingRemote, ReadOutcome, ScriptedRemote};
use conteggi::store::{DisabledStore, KeyValueStore};
use conteggi::{EventCounter, EventKey};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_never_recorded_key_reads_zero() {
    let (_, counter) = counter_with(Arc::new(ScriptedRemote::default()));
    for key in EventKey::RECOGNIZED.iter() {
        assert_eq!(counter.read_metric(key).await, 0);
    }
    assert_eq!(counter.read_metric(&EventKey::new("never_seen")).await, 0);
}

#[tokio::test]
async fn test_sequential_records_with_failing_remote() {
    let remote = Arc::new(ScriptedRemote::failing());
    let (store, counter) = counter_with(remote.clone());

    for _ in 0..7 {
        counter.record_event(&EventKey::PROJECT_CLICKS);
    }

    assert_eq!(counter.read_local(&EventKey::PROJECT_CLICKS), 7);
    assert_eq!(
        store
            .get("mw_sys_metric_global_project_clicks")
            .unwrap()
            .as_deref(),
        Some("7")
    );
    assert_eq!(counter.read_metric(&EventKey::PROJECT_CLICKS).await, 7);

    // the detached increments ran and failed quietly
    for _ in 0..10 {
        if remote.increments() == 7 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(remote.increments(), 7);
}

#[tokio::test]
async fn test_remote_ahead_of_local() {
    let remote = Arc::new(ScriptedRemote::default());
    let (store, counter) = counter_with(remote.clone());
    set_local(&store, &EventKey::APP_LOADS, 3);
    remote.answer(&EventKey::APP_LOADS, ReadOutcome::Count(120));
    assert_eq!(counter.read_metric(&EventKey::APP_LOADS).await, 120);
}

#[tokio::test]
async fn test_local_ahead_of_remote() {
    let remote = Arc::new(ScriptedRemote::default());
    let (store, counter) = counter_with(remote.clone());
    set_local(&store, &EventKey::APP_LOADS, 15);
    remote.answer(&EventKey::APP_LOADS, ReadOutcome::Count(9));
    assert_eq!(counter.read_metric(&EventKey::APP_LOADS).await, 15);
}

#[tokio::test]
async fn test_local_equal_to_remote() {
    let remote = Arc::new(ScriptedRemote::default());
    let (store, counter) = counter_with(remote.clone());
    set_local(&store, &EventKey::APP_LOADS, 8);
    remote.answer(&EventKey::APP_LOADS, ReadOutcome::Count(8));
    assert_eq!(counter.read_metric(&EventKey::APP_LOADS).await, 8);
}

#[tokio::test]
async fn test_failed_remote_read_returns_local() {
    let remote = Arc::new(ScriptedRemote::default());
    let (store, counter) = counter_with(remote.clone());
    set_local(&store, &EventKey::STREAM_INTERACTIONS, 4);

    for outcome in [
        ReadOutcome::Status(500),
        ReadOutcome::Status(404),
        ReadOutcome::Malformed,
    ] {
        remote.answer(&EventKey::STREAM_INTERACTIONS, outcome);
        assert_eq!(counter.read_metric(&EventKey::STREAM_INTERACTIONS).await, 4);
    }
}

#[tokio::test]
async fn test_each_record_notifies_every_live_subscription_once() {
    let (_, counter) = counter_with(Arc::new(ScriptedRemote::default()));
    let mut first = counter.subscribe();
    let mut second = counter.subscribe();
    let gone = counter.subscribe();
    gone.unsubscribe();

    let value = counter.record_event(&EventKey::NAV_SWITCHES);
    assert_eq!(value, 1);

    for sub in [&mut first, &mut second] {
        let update = sub.try_recv().expect("one notification");
        assert_eq!(update.key, EventKey::NAV_SWITCHES);
        assert_eq!(update.value, 1);
        assert!(sub.try_recv().is_none());
    }
    assert_eq!(counter.bus().subscriber_count(), 2);

    counter.record_event(&EventKey::NAV_SWITCHES);
    assert_eq!(first.try_recv().unwrap().value, 2);
    assert_eq!(second.try_recv().unwrap().value, 2);
}

#[tokio::test]
async fn test_record_does_not_wait_for_remote() {
    let (store, counter) = counter_with(Arc::new(HangingRemote));
    let mut sub = counter.subscribe();

    let recorded = tokio::time::timeout(Duration::from_secs(1), async {
        counter.record_event(&EventKey::APP_LOADS)
    })
    .await
    .expect("record_event returned");

    assert_eq!(recorded, 1);
    assert_eq!(
        store.get("mw_sys_metric_global_app_loads").unwrap().as_deref(),
        Some("1")
    );
    assert_eq!(sub.try_recv().unwrap().value, 1);
}

#[tokio::test]
async fn test_disabled_storage_still_notifies() {
    let counter = EventCounter::new(Arc::new(DisabledStore), Arc::new(ScriptedRemote::default()));
    let mut sub = counter.subscribe();

    assert_eq!(counter.record_event(&EventKey::APP_LOADS), 1);
    assert_eq!(sub.try_recv().unwrap().value, 1);
    assert_eq!(counter.read_metric(&EventKey::APP_LOADS).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_are_not_lost() {
    let (_, counter) = counter_with(Arc::new(ScriptedRemote::default()));
    let counter = Arc::new(counter);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let counter = Arc::clone(&counter);
        tasks.push(tokio::spawn(async move {
            for _ in 0..25 {
                counter.record_event(&EventKey::STREAM_INTERACTIONS);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(counter.read_local(&EventKey::STREAM_INTERACTIONS), 200);
}
