use chrono::{DateTime, Utc};
use dashmap::DashMap;

use paywatch_core::types::ConnId;

/// Dashboard connection lifecycle — linear progression, no backwards
/// transitions. `Disconnected` is terminal: the entry leaves the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Connected,
}

pub struct ClientSession {
    pub state: ConnState,
    pub connected_at: DateTime<Utc>,
}

/// Explicit registry of live push-channel connections.
///
/// Fan-out itself runs over per-connection broadcast receivers; the registry
/// only tracks lifecycle, so a stalled client can never block the others.
pub struct ConnectionRegistry {
    clients: DashMap<ConnId, ClientSession>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self { clients: DashMap::new() }
    }

    /// Track a freshly upgraded connection as `Connecting`.
    pub fn register(&self, conn_id: ConnId) {
        self.clients.insert(
            conn_id,
            ClientSession { state: ConnState::Connecting, connected_at: Utc::now() },
        );
    }

    /// Transition into `Connected` once the history replay has been sent.
    pub fn mark_connected(&self, conn_id: &ConnId) {
        if let Some(mut session) = self.clients.get_mut(conn_id) {
            session.state = ConnState::Connected;
        }
    }

    /// Terminal transition — drops the session. Passive beyond this removal:
    /// no backlog is kept for a client that comes back later.
    pub fn disconnect(&self, conn_id: &ConnId) {
        self.clients.remove(conn_id);
    }

    pub fn connected_count(&self) -> usize {
        self.clients
            .iter()
            .filter(|entry| entry.value().state == ConnState::Connected)
            .count()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_runs_connecting_connected_gone() {
        let registry = ConnectionRegistry::new();
        let conn_id = ConnId::new();

        registry.register(conn_id.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.connected_count(), 0);

        registry.mark_connected(&conn_id);
        assert_eq!(registry.connected_count(), 1);

        registry.disconnect(&conn_id);
        assert!(registry.is_empty());
    }

    #[test]
    fn disconnect_of_unknown_connection_is_a_no_op() {
        let registry = ConnectionRegistry::new();
        registry.disconnect(&ConnId::new());
        assert!(registry.is_empty());
    }
}
