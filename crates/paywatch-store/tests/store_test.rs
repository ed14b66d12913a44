use std::collections::HashSet;
use std::sync::Arc;

use paywatch_store::EventStore;
use serde_json::{json, Map, Value};
use tokio::sync::broadcast::error::TryRecvError;

fn payload(event_type: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("event_type".to_string(), json!(event_type));
    map
}

#[test]
fn append_assigns_strictly_increasing_ids() {
    let store = EventStore::new();

    let ids: Vec<i64> = (0..50).map(|_| store.append(payload("transfer")).id).collect();

    for pair in ids.windows(2) {
        assert!(pair[1] > pair[0], "ids must be strictly increasing: {:?}", pair);
    }
}

#[test]
fn snapshot_preserves_arrival_order() {
    let store = EventStore::new();
    store.append(payload("first"));
    store.append(payload("second"));
    store.append(payload("third"));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[0].payload["event_type"], json!("first"));
    assert_eq!(snapshot[1].payload["event_type"], json!("second"));
    assert_eq!(snapshot[2].payload["event_type"], json!("third"));
}

#[test]
fn reserved_payload_keys_are_stripped() {
    let store = EventStore::new();
    let mut body = payload("transfer");
    body.insert("id".to_string(), json!(999));
    body.insert("receivedAt".to_string(), json!("1970-01-01T00:00:00Z"));

    let record = store.append(body);

    assert_ne!(record.id, 999);
    assert!(!record.payload.contains_key("id"));
    assert!(!record.payload.contains_key("receivedAt"));
    assert_eq!(record.payload["event_type"], json!("transfer"));
}

#[test]
fn append_returns_the_stored_record() {
    let store = EventStore::new();
    let record = store.append(payload("transfer"));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, record.id);
    assert_eq!(snapshot[0].payload, record.payload);
}

#[test]
fn concurrent_appends_yield_unique_ids() {
    let store = Arc::new(EventStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                (0..50).map(|_| store.append(payload("transfer")).id).collect::<Vec<i64>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }

    assert_eq!(ids.len(), 400);
    assert_eq!(store.len(), 400);
}

#[test]
fn append_with_no_subscribers_does_not_fail() {
    let store = EventStore::new();
    store.append(payload("transfer"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn subscriber_sees_each_record_exactly_once() {
    let store = EventStore::new();
    store.append(payload("before-1"));
    store.append(payload("before-2"));

    let (snapshot, mut rx) = store.subscribe();
    assert_eq!(snapshot.len(), 2);

    store.append(payload("after"));

    let live = rx.recv().await.unwrap();
    assert_eq!(live.payload["event_type"], json!("after"));

    // nothing from the snapshot may be replayed on the live channel
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn early_subscriber_receives_all_appends_in_order() {
    let store = EventStore::new();
    let (snapshot, mut rx) = store.subscribe();
    assert!(snapshot.is_empty());

    for name in ["a", "b", "c"] {
        store.append(payload(name));
    }

    for name in ["a", "b", "c"] {
        let record = rx.recv().await.unwrap();
        assert_eq!(record.payload["event_type"], json!(name));
    }
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn independent_subscribers_each_get_every_record() {
    let store = EventStore::new();
    let (_, mut rx_a) = store.subscribe();
    let (_, mut rx_b) = store.subscribe();

    let appended = store.append(payload("transfer"));

    assert_eq!(rx_a.recv().await.unwrap().id, appended.id);
    assert_eq!(rx_b.recv().await.unwrap().id, appended.id);
}
