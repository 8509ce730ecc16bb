//! Waiting Queue Repository
//!
//! Position assignment and gap-closing renumbering are single SQL
//! statements so that each is atomic on its own; the service adds a
//! queue-wide lock around multi-statement sequences.

use sqlx::Sqlite;

use super::RepoResult;
use crate::db::models::{QueueEntry, QueueEntryView, UserSummary};

#[derive(sqlx::FromRow)]
struct QueueViewRow {
    id: String,
    user_id: String,
    position: i64,
    created_at: i64,
    user_name: String,
    user_email: String,
}

impl From<QueueViewRow> for QueueEntryView {
    fn from(row: QueueViewRow) -> Self {
        QueueEntryView {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            position: row.position,
            created_at: row.created_at,
        }
    }
}

/// Append a user at the tail: position = max(position) + 1, computed and
/// inserted in one statement so concurrent joins cannot read the same max.
pub async fn insert_next<'e, E>(
    db: E,
    id: &str,
    user_id: &str,
    created_at: i64,
) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let position = sqlx::query_scalar::<_, i64>(
        "INSERT INTO queue_entries (id, user_id, position, created_at)
         SELECT ?, ?, COALESCE(MAX(position), 0) + 1, ? FROM queue_entries
         RETURNING position",
    )
    .bind(id)
    .bind(user_id)
    .bind(created_at)
    .fetch_one(db)
    .await?;
    Ok(position)
}

pub async fn find_by_user<'e, E>(db: E, user_id: &str) -> RepoResult<Option<QueueEntry>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let entry = sqlx::query_as::<_, QueueEntry>(
        "SELECT id, user_id, position, created_at FROM queue_entries WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn list<'e, E>(db: E) -> RepoResult<Vec<QueueEntryView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, QueueViewRow>(
        "SELECT q.id, q.user_id, q.position, q.created_at,
                u.name AS user_name, u.email AS user_email
         FROM queue_entries q
         JOIN users u ON u.id = q.user_id
         ORDER BY q.position",
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(QueueEntryView::from).collect())
}

/// Front of the queue (minimum position)
pub async fn front<'e, E>(db: E) -> RepoResult<Option<QueueEntry>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let entry = sqlx::query_as::<_, QueueEntry>(
        "SELECT id, user_id, position, created_at FROM queue_entries
         ORDER BY position LIMIT 1",
    )
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

/// Remove a user's entry, returning it for renumbering
pub async fn delete_by_user<'e, E>(db: E, user_id: &str) -> RepoResult<Option<QueueEntry>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let entry = sqlx::query_as::<_, QueueEntry>(
        "DELETE FROM queue_entries WHERE user_id = ?
         RETURNING id, user_id, position, created_at",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

/// Shift every entry behind the removed position forward by one,
/// restoring the dense 1..N sequence.
pub async fn close_gap<'e, E>(db: E, removed_position: i64) -> RepoResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE queue_entries SET position = position - 1 WHERE position > ?")
        .bind(removed_position)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Number of entries strictly ahead of `position`
pub async fn rank<'e, E>(db: E, position: i64) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let ahead =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM queue_entries WHERE position < ?")
            .bind(position)
            .fetch_one(db)
            .await?;
    Ok(ahead)
}

pub async fn len<'e, E>(db: E) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM queue_entries")
        .fetch_one(db)
        .await?;
    Ok(total)
}
