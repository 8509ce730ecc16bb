//! Snapshot broadcasts
//!
//! One method per domain event. Each fetches the authoritative snapshot
//! from the store and publishes it; errors on this path are logged and
//! swallowed so a broadcast failure can never fail the mutation that
//! triggered it.

use serde::Serialize;
use sqlx::SqlitePool;

use super::bus::{
    CHANNEL_ORDERS, CHANNEL_QUEUE, CHANNEL_RESERVATIONS, CHANNEL_TABLES, Gateway, user_channel,
};
use crate::db::repository::{RepoResult, orders, queue, reservations, tables};
use crate::utils::time::now_millis;

#[derive(Debug, Clone)]
pub struct Notifier {
    pool: SqlitePool,
    gateway: Gateway,
}

impl Notifier {
    pub fn new(pool: SqlitePool, gateway: Gateway) -> Self {
        Self { pool, gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    fn emit<T: Serialize>(&self, channel: &str, event: &str, snapshot: RepoResult<T>) {
        match snapshot {
            Ok(data) => match serde_json::to_value(&data) {
                Ok(payload) => self.gateway.publish(channel, event, payload),
                Err(e) => tracing::warn!(channel, event, "Failed to encode snapshot: {e}"),
            },
            Err(e) => tracing::warn!(channel, event, "Failed to fetch snapshot: {e}"),
        }
    }

    /// `tables-updated`: every table with its active reservation/order
    pub async fn tables_changed(&self) {
        self.emit(
            CHANNEL_TABLES,
            "tables-updated",
            tables::overviews(&self.pool).await,
        );
    }

    /// `reservations-updated`: currently active, unexpired reservations
    pub async fn reservations_changed(&self) {
        self.emit(
            CHANNEL_RESERVATIONS,
            "reservations-updated",
            reservations::find_active(&self.pool, now_millis()).await,
        );
    }

    /// `orders-updated`: orders still moving through the kitchen
    pub async fn orders_changed(&self) {
        self.emit(
            CHANNEL_ORDERS,
            "orders-updated",
            orders::find_active(&self.pool).await,
        );
    }

    /// `queue-updated`: the full waiting queue in position order
    pub async fn queue_changed(&self) {
        self.emit(CHANNEL_QUEUE, "queue-updated", queue::list(&self.pool).await);
    }

    /// User-scoped notice on the `user-{id}` channel
    pub fn user_notify(&self, user_id: &str, event: &str, payload: serde_json::Value) {
        self.gateway.publish(&user_channel(user_id), event, payload);
    }

    /// `queue-position` notice for one user
    pub fn queue_position(&self, user_id: &str, position: i64, total: i64) {
        self.user_notify(
            user_id,
            "queue-position",
            serde_json::json!({ "position": position, "totalInQueue": total }),
        );
    }

    /// `table-available` notice, emitted whenever a table returns to FREE
    pub fn table_available(&self, table_id: &str) {
        self.gateway.publish(
            CHANNEL_TABLES,
            "table-available",
            serde_json::json!({ "tableId": table_id }),
        );
    }
}
