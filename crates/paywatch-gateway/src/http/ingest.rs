//! Webhook ingress endpoint — POST /webhook.
//!
//! Accepts any JSON object from the payment provider. No payload validation
//! and no authentication: a body that parses is a body that is stored. The
//! append also publishes the stored record to every connected dashboard, so
//! exactly one push event goes out per accepted request.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::app::AppState;

/// Fixed acknowledgement body for accepted webhooks.
#[derive(Debug, Serialize)]
pub struct IngestAck {
    pub message: String,
}

/// POST /webhook
///
/// Malformed or non-object bodies never reach this handler — the `Json`
/// extractor rejects them first. Once here, the request always succeeds.
pub async fn ingest_webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Map<String, Value>>,
) -> Json<IngestAck> {
    let record = state.store.append(payload);

    info!(
        id = record.id,
        fields = record.payload.len(),
        clients = state.registry.connected_count(),
        "webhook stored and broadcast"
    );

    Json(IngestAck {
        message: "Webhook received successfully".to_string(),
    })
}
