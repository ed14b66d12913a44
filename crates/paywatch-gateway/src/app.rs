use axum::{
    routing::{get, post},
    Router,
};
use paywatch_core::config::PaywatchConfig;
use paywatch_store::EventStore;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::ws::registry::ConnectionRegistry;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: PaywatchConfig,
    pub event_seq: AtomicU64,
    pub store: EventStore,
    pub registry: ConnectionRegistry,
}

impl AppState {
    pub fn new(config: PaywatchConfig) -> Self {
        Self {
            config,
            event_seq: AtomicU64::new(0),
            store: EventStore::new(),
            registry: ConnectionRegistry::new(),
        }
    }

    /// Monotonically increasing sequence for push frames.
    pub fn next_seq(&self) -> u64 {
        self.event_seq.fetch_add(1, Ordering::Relaxed)
    }
}

/// Assemble the full Axum router.
///
/// Layer order (outermost first): trace → CORS → origin guard → handlers,
/// so disallowed origins are refused before any application logic runs.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/webhook", post(crate::http::ingest::ingest_webhook))
        .route("/webhooks", get(crate::http::history::list_webhooks))
        .route("/ws", get(crate::ws::connection::ws_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::origin::origin_guard,
        ))
        .layer(crate::origin::cors_layer(&state.config.frontend))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
