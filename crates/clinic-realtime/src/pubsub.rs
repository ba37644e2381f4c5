//! In-memory pub/sub for single-node deployments.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::sync::broadcast;

use crate::message::OutboundMessage;

/// In-memory pub/sub implementation.
#[derive(Debug)]
pub struct MemoryPubSub {
    /// Channel name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<OutboundMessage>>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl MemoryPubSub {
    /// Create a new in-memory pub/sub
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Publish a message to a channel. Returns the number of receivers
    /// it reached; channels nobody listens on are skipped.
    pub async fn publish(&self, channel: &str, msg: OutboundMessage) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(channel)
            .and_then(|tx| tx.send(msg).ok())
            .unwrap_or(0)
    }

    /// Subscribe to a channel, returns a receiver
    pub async fn subscribe(&self, channel: &str) -> broadcast::Receiver<OutboundMessage> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        tx.subscribe()
    }

    /// Drop channels with no remaining receivers.
    pub async fn prune(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, tx| tx.receiver_count() > 0);
        before - channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pong(timestamp: i64) -> OutboundMessage {
        OutboundMessage::Pong { timestamp }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = MemoryPubSub::new(8);
        let mut a = bus.subscribe("user:a").await;
        let mut b = bus.subscribe("user:a").await;

        assert_eq!(bus.publish("user:a", pong(1)).await, 2);
        assert!(matches!(a.recv().await.unwrap(), OutboundMessage::Pong { timestamp: 1 }));
        assert!(matches!(b.recv().await.unwrap(), OutboundMessage::Pong { timestamp: 1 }));
    }

    #[tokio::test]
    async fn test_unknown_channel_is_a_no_op() {
        let bus = MemoryPubSub::new(8);
        assert_eq!(bus.publish("user:nobody", pong(1)).await, 0);
    }

    #[tokio::test]
    async fn test_prune_drops_abandoned_channels() {
        let bus = MemoryPubSub::new(8);
        let kept = bus.subscribe("role:doctor").await;
        drop(bus.subscribe("role:admin").await);

        assert_eq!(bus.prune().await, 1);
        drop(kept);
        assert_eq!(bus.prune().await, 1);
    }
}
