//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::order::OrderSummary;
use super::reservation::ReservationSummary;

/// Table occupancy lifecycle status.
///
/// Transitions are driven by the managers, never by the registry itself:
///
/// ```text
/// FREE --(reservation created)--> RESERVED
/// FREE --(walk-in seated)-------> OCCUPIED
/// RESERVED --(cancelled/expired)--> FREE
/// RESERVED --(party seated)-------> OCCUPIED
/// OCCUPIED --(order delivered)----> WAITING_CLEANUP
/// OCCUPIED --(order cancelled)----> FREE
/// WAITING_CLEANUP --(cleanup done)--> FREE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Free,
    Reserved,
    Occupied,
    WaitingCleanup,
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiningTable {
    pub id: String,
    /// Human-facing table number, unique per restaurant
    pub number: i64,
    pub capacity: i64,
    pub status: TableStatus,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: i64,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<i64>,
    pub capacity: Option<i64>,
}

/// Unconditional status write payload (PATCH /api/tables/{id}/status)
#[derive(Debug, Clone, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}

/// Table with its active reservation/order attached, for display lists
#[derive(Debug, Clone, Serialize)]
pub struct TableOverview {
    #[serde(flatten)]
    pub table: DiningTable,
    pub reservation: Option<ReservationSummary>,
    pub order: Option<OrderSummary>,
}
