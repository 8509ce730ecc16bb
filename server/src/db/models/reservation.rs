//! Reservation Model

use serde::{Deserialize, Serialize};

use super::dining_table::DiningTable;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Expired,
    Cancelled,
    Completed,
}

/// Reservation entity — a time-boxed hold on a table.
///
/// `expires_at` is always `created_at` + the configured TTL (15 minutes
/// by default). At most one ACTIVE reservation may exist per table,
/// enforced by a partial unique index in addition to the manager check.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub table_id: String,
    pub status: ReservationStatus,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationCreate {
    pub table_id: String,
}

/// Update reservation payload (administrative correction)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationUpdate {
    pub status: Option<ReservationStatus>,
}

/// Reservation with user and table attached, returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: String,
    pub user: UserSummary,
    pub table: DiningTable,
    pub status: ReservationStatus,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Reservation summary embedded in a table overview
#[derive(Debug, Clone, Serialize)]
pub struct ReservationSummary {
    pub id: String,
    pub user: UserSummary,
    pub status: ReservationStatus,
    pub expires_at: i64,
}

impl ReservationView {
    pub fn into_summary(self) -> ReservationSummary {
        ReservationSummary {
            id: self.id,
            user: self.user,
            status: self.status,
            expires_at: self.expires_at,
        }
    }
}
