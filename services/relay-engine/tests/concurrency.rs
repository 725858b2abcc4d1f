//! Concurrency tests
//!
//! Many uploaders and pollers share one engine; verifies that no slave
//! ever receives the same signal twice and that the sweeper task runs on
//! its own schedule.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use copier_types::ids::{MasterId, SignalId, SlaveId};
use copier_types::signal::SignalRequest;
use proptest::prelude::*;
use relay_engine::{ManualClock, RelayConfig, RelayEngine, RetentionSweeper};
use serde_json::json;

fn upload(engine: &RelayEngine, master_id: &str, action: &str, ticket: i64) {
    let request: SignalRequest = serde_json::from_value(json!({
        "master_id": master_id,
        "action": action,
        "master_ticket": ticket,
        "symbol": "EURUSD"
    }))
    .unwrap();
    engine.ingest(request).unwrap();
}

#[test]
fn test_concurrent_polls_never_duplicate() {
    let engine = Arc::new(RelayEngine::new(RelayConfig::default()));
    for ticket in 0..40 {
        upload(&engine, "M1", "MODIFY_TRADE", ticket);
    }

    // Same slave polling from several threads at once.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let master = MasterId::try_new("M1").unwrap();
                let slave = SlaveId::try_new("S1").unwrap();
                let mut got = Vec::new();
                while let Some(signal) = engine.poll(&master, &slave) {
                    got.push(signal.signal_id);
                }
                got
            })
        })
        .collect();

    let mut all: Vec<SignalId> = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    let unique: HashSet<&SignalId> = all.iter().collect();
    assert_eq!(all.len(), 40);
    assert_eq!(unique.len(), 40);
}

#[test]
fn test_concurrent_masters_and_slaves() {
    let engine = Arc::new(RelayEngine::new(RelayConfig::default()));

    let uploaders: Vec<_> = (0..4)
        .map(|m| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let master = format!("M{}", m);
                for ticket in 0..30 {
                    upload(&engine, &master, "NEW_TRADE", ticket);
                    upload(&engine, &master, "NEW_TRADE", ticket);
                    if ticket % 3 == 0 {
                        upload(&engine, &master, "CLOSE_TRADE", ticket);
                    }
                }
            })
        })
        .collect();

    let pollers: Vec<_> = (0..4)
        .map(|m| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let master = MasterId::try_new(format!("M{}", m)).unwrap();
                let slave = SlaveId::try_new(format!("S{}", m)).unwrap();
                let mut seen = HashSet::new();
                for _ in 0..200 {
                    if let Some(signal) = engine.poll(&master, &slave) {
                        assert!(seen.insert(signal.signal_id), "signal delivered twice");
                    }
                }
            })
        })
        .collect();

    for handle in uploaders.into_iter().chain(pollers) {
        handle.join().unwrap();
    }

    for m in 0..4 {
        let master = MasterId::try_new(format!("M{}", m)).unwrap();
        let queued = engine.queued_signals(&master);
        assert!(queued.len() <= 50);
        // every close landed after its ticket's open was removed
        for close in queued.iter().filter(|s| s.action.is_terminal()) {
            assert_eq!(
                queued.iter().filter(|s| s.master_ticket == close.master_ticket).count(),
                1
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_spawned_sweeper_prunes_on_interval() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let engine = Arc::new(RelayEngine::with_clock(RelayConfig::default(), clock.clone()));
    upload(&engine, "M1", "NEW_TRADE", 1);

    let handle = RetentionSweeper::spawn(Arc::clone(&engine));
    clock.advance(Duration::minutes(11));

    tokio::time::sleep(StdDuration::from_secs(61)).await;
    tokio::task::yield_now().await;

    assert!(!engine.has_queue(&MasterId::try_new("M1").unwrap()));
    handle.abort();
}

proptest! {
    #[test]
    fn prop_queue_never_exceeds_capacity(tickets in proptest::collection::vec(0i64..100, 1..200)) {
        let engine = RelayEngine::new(RelayConfig::default());
        for ticket in &tickets {
            upload(&engine, "M1", "NEW_TRADE", *ticket);
        }
        let master = MasterId::try_new("M1").unwrap();
        prop_assert!(engine.pending_count(&master) <= 50);
    }

    #[test]
    fn prop_delivery_follows_arrival_order(count in 1usize..60) {
        let engine = RelayEngine::new(RelayConfig::default());
        for ticket in 0..count as i64 {
            upload(&engine, "M1", "MODIFY_TRADE", ticket);
        }
        let master = MasterId::try_new("M1").unwrap();
        let slave = SlaveId::try_new("S1").unwrap();
        let expected: Vec<SignalId> = engine
            .queued_signals(&master)
            .into_iter()
            .map(|s| s.signal_id)
            .collect();
        let delivered: Vec<SignalId> = std::iter::from_fn(|| engine.poll(&master, &slave))
            .map(|s| s.signal_id)
            .collect();
        prop_assert_eq!(delivered, expected);
    }
}
