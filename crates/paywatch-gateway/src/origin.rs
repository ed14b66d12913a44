//! Cross-origin policy — one allow-list for the HTTP surface and the WS
//! handshake alike.
//!
//! Two layers cooperate: `CorsLayer` answers preflights and stamps response
//! headers for browsers, while `origin_guard` refuses any request carrying a
//! disallowed `Origin` header before application logic runs. Requests with
//! no `Origin` at all (the provider's server-to-server POSTs) pass untouched.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::app::AppState;
use paywatch_core::config::FrontendConfig;
use paywatch_core::error::PaywatchError;

/// Credentialed CORS restricted to the configured dashboard origins.
pub fn cors_layer(frontend: &FrontendConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = frontend
        .allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Refuse requests from origins outside the allow-list with 403.
///
/// No record is stored and nothing is broadcast for a refused request.
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        if !state.config.frontend.is_allowed(origin) {
            warn!(origin, path = %req.uri().path(), "request from disallowed origin refused");
            let err = PaywatchError::OriginDenied { origin: origin.to_string() };
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": { "code": err.code(), "message": err.to_string() }
                })),
            )
                .into_response();
        }
    }

    next.run(req).await
}
