//! Append-only in-memory webhook buffer with live fan-out.
//!
//! One `EventStore` instance is shared across the whole process (pass as
//! part of the gateway state). Records live until the process exits; there
//! is no eviction and no persistence.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use paywatch_core::config::BROADCAST_CAPACITY;
use paywatch_core::types::WebhookRecord;

/// Server-stamped fields that inbound payloads may not override.
const RESERVED_KEYS: [&str; 2] = ["id", "receivedAt"];

/// Ordered buffer of accepted webhooks plus a broadcast channel that pushes
/// each new record to all live subscribers.
pub struct EventStore {
    inner: Mutex<Inner>,
    tx: broadcast::Sender<WebhookRecord>,
}

struct Inner {
    records: Vec<WebhookRecord>,
    last_id: i64,
}

impl EventStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Mutex::new(Inner { records: Vec::new(), last_id: 0 }),
            tx,
        }
    }

    /// Stamp, append and publish one webhook. Always succeeds.
    ///
    /// The broadcast happens while the store lock is held: `subscribe` takes
    /// the same lock, so a subscriber observes any record either in its
    /// snapshot or on its receiver, never both and never neither.
    pub fn append(&self, mut payload: Map<String, Value>) -> WebhookRecord {
        for key in RESERVED_KEYS {
            payload.remove(key);
        }

        let mut inner = self.inner.lock().expect("event store poisoned");
        let received_at = Utc::now();
        // Wall-clock id, bumped past the previous one so ids stay strictly
        // increasing even when two requests land in the same millisecond.
        let id = received_at.timestamp_millis().max(inner.last_id + 1);
        inner.last_id = id;

        let record = WebhookRecord { id, received_at, payload };
        inner.records.push(record.clone());
        let _ = self.tx.send(record.clone());

        debug!(id, total = inner.records.len(), "webhook appended");
        record
    }

    /// All records in arrival order.
    pub fn snapshot(&self) -> Vec<WebhookRecord> {
        self.inner.lock().expect("event store poisoned").records.clone()
    }

    /// Atomically take the current history and a live receiver.
    ///
    /// Everything in the snapshot predates the receiver; everything appended
    /// afterwards arrives on the receiver, in append order.
    pub fn subscribe(&self) -> (Vec<WebhookRecord>, broadcast::Receiver<WebhookRecord>) {
        let inner = self.inner.lock().expect("event store poisoned");
        (inner.records.clone(), self.tx.subscribe())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("event store poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
