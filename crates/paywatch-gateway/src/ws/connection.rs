use axum::{
    extract::{ws::Message, ws::WebSocket, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::app::AppState;
use crate::ws::send;
use paywatch_core::types::ConnId;
use paywatch_protocol::events;
use paywatch_protocol::frames::EventFrame;

/// Axum handler — upgrades HTTP to WebSocket at GET /ws.
///
/// Origin policy has already run in the middleware stack by the time the
/// upgrade request lands here.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_connection(socket, state))
}

/// Per-connection event loop — lives for the entire WS session.
async fn run_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnId::new();
    state.registry.register(conn_id.clone());
    info!(conn_id = %conn_id, "new dashboard connection");

    let (mut tx, mut rx) = socket.split();

    // Snapshot and live receiver come from the same critical section as
    // append+publish, so each record reaches this client exactly once:
    // in the replay below, or on the receiver, never both.
    let (snapshot, mut events_rx) = state.store.subscribe();

    let replay =
        EventFrame::new(events::EXISTING_WEBHOOKS, &snapshot).with_seq(state.next_seq());
    if send::json(&mut tx, &replay).await.is_err() {
        state.registry.disconnect(&conn_id);
        return;
    }
    state.registry.mark_connected(&conn_id);
    info!(conn_id = %conn_id, replayed = snapshot.len(), "history replayed");

    loop {
        tokio::select! {
            msg = rx.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // dashboards only listen; inbound frames carry nothing
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(conn_id = %conn_id, error = %e, "socket error");
                        break;
                    }
                }
            }

            event = events_rx.recv() => {
                match event {
                    Ok(record) => {
                        let frame = EventFrame::new(events::NEW_WEBHOOK, &record)
                            .with_seq(state.next_seq());
                        if send::json(&mut tx, &frame).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // only this consumer loses events; the rest keep pace
                        warn!(conn_id = %conn_id, skipped, "slow consumer, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    state.registry.disconnect(&conn_id);
    info!(conn_id = %conn_id, "dashboard connection closed");
}
