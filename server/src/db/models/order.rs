//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dining_table::DiningTable;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// An order in one of these states blocks a second order on the table
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::InPreparation | OrderStatus::Ready
        )
    }
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Line item as submitted by the client (id assigned server-side)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub note: Option<String>,
}

impl OrderItemInput {
    pub fn into_item(self) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            note: self.note,
        }
    }
}

/// Order entity — one food order tied to one occupied table.
///
/// `total` is computed server-side from the line items; it is never
/// accepted from the client.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub table_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sum of price × quantity over the line items
pub fn total_of(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| {
            acc + item.price * Decimal::from(item.quantity)
        })
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub table_id: String,
    pub items: Vec<OrderItemInput>,
}

/// Update order payload (replaces the line items)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub items: Option<Vec<OrderItemInput>>,
}

/// Order with user and table attached, returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: String,
    pub user: UserSummary,
    pub table: DiningTable,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order summary embedded in a table overview
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub user: UserSummary,
    pub status: OrderStatus,
    pub total: Decimal,
}

impl OrderView {
    pub fn into_summary(self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            user: self.user,
            status: self.status,
            total: self.total,
        }
    }
}
