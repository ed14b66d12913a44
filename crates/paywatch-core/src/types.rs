use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// A webhook accepted from the payment provider.
///
/// `id` and `receivedAt` are stamped by the server at ingestion; the
/// provider's own fields are flattened onto the record verbatim. The two
/// server-owned keys are reserved — inbound payloads cannot override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRecord {
    /// Ingestion wall-clock milliseconds, strictly increasing across records.
    pub id: i64,

    /// When the server accepted the webhook (ISO-8601, UTC).
    #[serde(rename = "receivedAt")]
    pub received_at: DateTime<Utc>,

    /// Provider payload, schema-less string-keyed JSON.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Per-connection identifier (random UUID, not persisted).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnId(pub String);

impl ConnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
