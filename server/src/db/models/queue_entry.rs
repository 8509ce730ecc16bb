//! Waiting Queue Model

use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// Waiting queue entry.
///
/// `position` is assigned monotonically at join time and renumbered on
/// removal so that current entries always form a dense 1..N sequence.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueueEntry {
    pub id: String,
    pub user_id: String,
    pub position: i64,
    pub created_at: i64,
}

/// Queue entry with user attached
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntryView {
    pub id: String,
    pub user: UserSummary,
    pub position: i64,
    pub created_at: i64,
}

/// A user's place in the queue.
///
/// `position` here is recomputed as rank (entries ahead + 1) rather than
/// read from the stored field, so it self-heals if numbering ever drifts.
#[derive(Debug, Clone, Serialize)]
pub struct QueuePosition {
    pub id: String,
    pub user: UserSummary,
    pub position: i64,
    pub total_in_queue: i64,
    pub created_at: i64,
}
