use axum::{extract::State, Json};
use paywatch_core::types::WebhookRecord;
use std::sync::Arc;

use crate::app::AppState;

/// GET /webhooks — full buffered history in arrival order.
///
/// No pagination and no filtering: newly loading dashboards take the whole
/// dump once, then follow the push channel.
pub async fn list_webhooks(State(state): State<Arc<AppState>>) -> Json<Vec<WebhookRecord>> {
    Json(state.store.snapshot())
}
