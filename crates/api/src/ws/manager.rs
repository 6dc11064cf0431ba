use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use demodet_core::types::DbId;
use tokio::sync::{mpsc, RwLock};

/// Sender half of a connection's outbound queue.
pub type WsSender = mpsc::UnboundedSender<Message>;

pub struct WsConnection {
    /// Every connection is authenticated before it is registered.
    pub user_id: DbId,
    pub sender: WsSender,
}

/// Result of removing a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub user_id: DbId,
    /// True when this was the user's last open connection.
    pub went_offline: bool,
}

/// All active WebSocket connections, keyed by connection id.
///
/// A user is online while at least one of their connections is registered.
/// Wrapped in `Arc` and shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection and return its outbound receiver plus whether
    /// the user just came online.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
    ) -> (mpsc::UnboundedReceiver<Message>, bool) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut conns = self.connections.write().await;
        let came_online = !conns.values().any(|c| c.user_id == user_id);
        conns.insert(
            conn_id,
            WsConnection {
                user_id,
                sender: tx,
            },
        );
        (rx, came_online)
    }

    /// Remove a connection. `None` if the id was unknown.
    pub async fn remove(&self, conn_id: &str) -> Option<Removed> {
        let mut conns = self.connections.write().await;
        let conn = conns.remove(conn_id)?;
        let went_offline = !conns.values().any(|c| c.user_id == conn.user_id);
        Some(Removed {
            user_id: conn.user_id,
            went_offline,
        })
    }

    pub async fn online_user_ids(&self) -> HashSet<DbId> {
        self.connections
            .read()
            .await
            .values()
            .map(|c| c.user_id)
            .collect()
    }

    /// Send to every client. Closed channels are skipped; their reader loop
    /// removes them.
    pub async fn broadcast(&self, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|c| c.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Send to every connection of the listed users. Returns how many were
    /// reached.
    pub async fn send_to_users(&self, user_ids: &[DbId], message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|c| user_ids.contains(&c.user_id))
            .filter(|c| c.sender.send(message.clone()).is_ok())
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then forget them all.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
