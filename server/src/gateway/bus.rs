//! 广播总线
//!
//! # 消息流
//!
//! ```text
//! Service ──▶ publish(channel, event, payload) ──▶ broadcast::Sender
//!                                                       │
//!                                        subscribe() ───┴──▶ transports
//! ```
//!
//! The bus carries domain events to whatever transport layer is mounted
//! on top (websocket adapter, in-process consumer, tests). Each channel
//! keeps a monotonically increasing sequence number so subscribers can
//! tell stale snapshots from fresh ones.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

/// Channel names for the shared (non user-scoped) event streams
pub const CHANNEL_TABLES: &str = "tables";
pub const CHANNEL_RESERVATIONS: &str = "reservations";
pub const CHANNEL_ORDERS: &str = "orders";
pub const CHANNEL_QUEUE: &str = "queue";

/// Per-user channel name (`user-{id}`)
pub fn user_channel(user_id: &str) -> String {
    format!("user-{user_id}")
}

/// 频道版本管理器
///
/// 每个频道维护独立的版本号，支持原子递增，
/// 订阅者可以通过版本号判断快照新旧。
#[derive(Debug, Default)]
struct ChannelVersions {
    versions: DashMap<String, u64>,
}

impl ChannelVersions {
    fn increment(&self, channel: &str) -> u64 {
        let mut entry = self.versions.entry(channel.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

/// A single broadcast message: named channel, event name, payload
#[derive(Debug, Clone, Serialize)]
pub struct GatewayMessage {
    pub channel: String,
    pub event: String,
    pub seq: u64,
    pub payload: serde_json::Value,
}

/// Fan-out bus over a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct Gateway {
    tx: broadcast::Sender<GatewayMessage>,
    versions: Arc<ChannelVersions>,
}

impl Gateway {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: Arc::new(ChannelVersions::default()),
        }
    }

    /// Subscribe to every channel; callers filter on `channel`
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayMessage> {
        self.tx.subscribe()
    }

    /// Publish an event. Never fails: with no subscribers connected the
    /// send error is logged at debug level and dropped.
    pub fn publish(&self, channel: &str, event: &str, payload: serde_json::Value) {
        let seq = self.versions.increment(channel);
        let msg = GatewayMessage {
            channel: channel.to_string(),
            event: event.to_string(),
            seq,
            payload,
        };
        if let Err(e) = self.tx.send(msg) {
            tracing::debug!(channel, event, "No live subscribers for broadcast: {e}");
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
