//! A thread-safe WebSocket manager for topic-based message broadcasting.
//!
//! Uses Tokio broadcast channels per topic. Topics are created lazily on first
//! subscription and removed once their subscriber count drops to zero.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Type alias for topic name.
type Topic = String;

/// Sender for a topic's broadcast channel.
type Sender = broadcast::Sender<String>;

/// Receiver for a topic's broadcast channel.
type Receiver = broadcast::Receiver<String>;

/// Manages broadcast channels per topic to support real-time WebSocket communication.
#[derive(Clone, Default)]
pub struct WebSocketManager {
    inner: Arc<RwLock<HashMap<Topic, Sender>>>,
}

impl WebSocketManager {
    /// Creates a new, empty `WebSocketManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the given topic, creating it if necessary.
    pub async fn subscribe(&self, topic: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }

    /// Broadcasts a message to all subscribers of `topic`.
    ///
    /// If the topic does not exist, it's a no-op.
    /// If the topic has zero subscribers after sending, it is removed.
    pub async fn broadcast<T: Into<String>>(&self, topic: &str, msg: T) {
        let mut map = self.inner.write().await;
        if let Some(sender) = map.get(topic) {
            let _ = sender.send(msg.into());
            if sender.receiver_count() == 0 {
                tracing::debug!("Removing topic '{topic}' due to no subscribers.");
                map.remove(topic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn it_broadcasts_to_all_subscribers() {
        let manager = WebSocketManager::new();
        let topic = "attendance:section:1";

        let mut r1 = manager.subscribe(topic).await;
        let mut r2 = manager.subscribe(topic).await;

        manager.broadcast(topic, "hello").await;

        let msg1 = timeout(Duration::from_millis(50), r1.recv())
            .await
            .unwrap()
            .unwrap();
        let msg2 = timeout(Duration::from_millis(50), r2.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(msg1, "hello");
        assert_eq!(msg2, "hello");
    }

    #[tokio::test]
    async fn broadcast_to_unknown_topic_is_noop() {
        let manager = WebSocketManager::new();
        manager.broadcast("attendance:section:999", "nobody home").await;
    }
}
