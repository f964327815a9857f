//! In-process realtime hub.
//!
//! The engine publishes completion signals through `RealtimePort`; this
//! default implementation fans them out on a `tokio::sync::broadcast`
//! channel so the host can bridge to whatever transport it owns
//! (WebSocket, SSE, a message bus). No subscribers is not an error -
//! signals are best-effort.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::infrastructure::ports::{PublishError, RealtimePort};

/// One published signal.
#[derive(Debug, Clone)]
pub struct RealtimeEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

pub struct BroadcastRealtime {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl BroadcastRealtime {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Attach a consumer. Slow consumers lag and drop, they never block
    /// the publisher.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl RealtimePort for BroadcastRealtime {
    async fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        let event = RealtimeEvent {
            topic: topic.to_string(),
            payload,
        };
        if self.tx.send(event).is_err() {
            tracing::debug!(topic, "realtime signal published with no subscribers");
        }
        Ok(())
    }
}
