//! Connection registry for WebSocket push

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use shared::PushMessage;
use tokio::sync::mpsc;

/// One live WebSocket connection
struct ConnectionHandle {
    conn_id: u64,
    tx: mpsc::Sender<PushMessage>,
}

/// Registry of authenticated WebSocket connections, keyed by user id.
///
/// A user may hold several connections at once (multiple tabs/devices); each
/// gets its own handle. Delivery is best-effort: offline users are a silent
/// no-op, and a full or closed channel drops the frame rather than blocking
/// the sender.
pub struct ConnectionRegistry {
    connections: DashMap<i64, Vec<ConnectionHandle>>,
    next_conn_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_conn_id: AtomicU64::new(1),
        }
    }

    /// Register a connection; returns the connection id used to unregister
    pub fn register(&self, user_id: i64, tx: mpsc::Sender<PushMessage>) -> u64 {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        self.connections
            .entry(user_id)
            .or_default()
            .push(ConnectionHandle { conn_id, tx });
        tracing::debug!(user_id, conn_id, "WebSocket connection registered");
        conn_id
    }

    /// Remove one connection; drops the user entry once its last connection
    /// is gone
    pub fn unregister(&self, user_id: i64, conn_id: u64) {
        if let Some(mut entry) = self.connections.get_mut(&user_id) {
            entry.retain(|h| h.conn_id != conn_id);
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.connections.remove_if(&user_id, |_, v| v.is_empty());
            }
        }
        tracing::debug!(user_id, conn_id, "WebSocket connection unregistered");
    }

    /// Push to every connection of one user. No-op when offline.
    pub fn send_to_user(&self, user_id: i64, message: &PushMessage) {
        if let Some(entry) = self.connections.get(&user_id) {
            for handle in entry.iter() {
                if handle.tx.try_send(message.clone()).is_err() {
                    tracing::warn!(user_id, conn_id = handle.conn_id, "Push channel full or closed, frame dropped");
                }
            }
        }
    }

    /// Push to every connected user
    pub fn send_to_all(&self, message: &PushMessage) {
        for entry in self.connections.iter() {
            for handle in entry.value().iter() {
                if handle.tx.try_send(message.clone()).is_err() {
                    tracing::warn!(user_id = *entry.key(), conn_id = handle.conn_id, "Push channel full or closed, frame dropped");
                }
            }
        }
    }

    /// Ids of all currently connected users
    pub fn connected_user_ids(&self) -> Vec<i64> {
        self.connections.iter().map(|e| *e.key()).collect()
    }

    pub fn is_connected(&self, user_id: i64) -> bool {
        self.connections
            .get(&user_id)
            .map(|e| !e.is_empty())
            .unwrap_or(false)
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

    fn channel() -> (mpsc::Sender<PushMessage>, mpsc::Receiver<PushMessage>) {
        mpsc::channel(16)
    }

    #[test]
    fn offline_user_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.send_to_user(99, &PushMessage::AuthSuccess);
        assert!(!registry.is_connected(99));
    }

    #[test]
    fn delivers_to_every_connection_of_a_user() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(7, tx1);
        registry.register(7, tx2);

        registry.send_to_user(7, &PushMessage::AuthSuccess);

        assert!(matches!(rx1.try_recv(), Ok(PushMessage::AuthSuccess)));
        assert!(matches!(rx2.try_recv(), Ok(PushMessage::AuthSuccess)));
    }

    #[test]
    fn unregister_removes_only_that_connection() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        let conn1 = registry.register(7, tx1);
        registry.register(7, tx2);

        registry.unregister(7, conn1);
        registry.send_to_user(7, &PushMessage::AuthSuccess);

        assert!(rx1.try_recv().is_err());
        assert!(matches!(rx2.try_recv(), Ok(PushMessage::AuthSuccess)));
        assert!(registry.is_connected(7));
    }

    #[test]
    fn last_unregister_clears_presence() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let conn = registry.register(3, tx);
        registry.unregister(3, conn);
        assert!(!registry.is_connected(3));
        assert!(registry.connected_user_ids().is_empty());
    }

    #[test]
    fn broadcast_reaches_all_users() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(1, tx1);
        registry.register(2, tx2);

        registry.send_to_all(&PushMessage::AuthSuccess);

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
