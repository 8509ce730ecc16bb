//! Reservation Repository

use sqlx::Sqlite;

use super::RepoResult;
use crate::db::models::{
    DiningTable, Reservation, ReservationStatus, ReservationView, TableStatus, UserSummary,
};

/// Flat row for the user/table joined queries
#[derive(sqlx::FromRow)]
struct ReservationViewRow {
    id: String,
    user_id: String,
    table_id: String,
    status: ReservationStatus,
    expires_at: i64,
    created_at: i64,
    user_name: String,
    user_email: String,
    table_number: i64,
    table_capacity: i64,
    table_status: TableStatus,
    table_created_at: i64,
}

impl From<ReservationViewRow> for ReservationView {
    fn from(row: ReservationViewRow) -> Self {
        ReservationView {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            table: DiningTable {
                id: row.table_id,
                number: row.table_number,
                capacity: row.table_capacity,
                status: row.table_status,
                created_at: row.table_created_at,
            },
            status: row.status,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

const VIEW_SELECT: &str = "SELECT r.id, r.user_id, r.table_id, r.status, r.expires_at, r.created_at,
        u.name AS user_name, u.email AS user_email,
        t.number AS table_number, t.capacity AS table_capacity,
        t.status AS table_status, t.created_at AS table_created_at
 FROM reservations r
 JOIN users u ON u.id = r.user_id
 JOIN dining_tables t ON t.id = r.table_id";

pub async fn insert<'e, E>(db: E, reservation: &Reservation) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO reservations (id, user_id, table_id, status, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&reservation.id)
    .bind(&reservation.user_id)
    .bind(&reservation.table_id)
    .bind(reservation.status)
    .bind(reservation.expires_at)
    .bind(reservation.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<Reservation>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, table_id, status, expires_at, created_at
         FROM reservations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

pub async fn find_view_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<ReservationView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ReservationViewRow>(&format!("{VIEW_SELECT} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(ReservationView::from))
}

/// ACTIVE reservations that have not yet expired at `now`
pub async fn find_active<'e, E>(db: E, now: i64) -> RepoResult<Vec<ReservationView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ReservationViewRow>(&format!(
        "{VIEW_SELECT} WHERE r.status = 'ACTIVE' AND r.expires_at > ? ORDER BY r.created_at"
    ))
    .bind(now)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(ReservationView::from).collect())
}

/// The unexpired ACTIVE hold on a table, if any
pub async fn find_active_for_table<'e, E>(
    db: E,
    table_id: &str,
    now: i64,
) -> RepoResult<Option<Reservation>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, table_id, status, expires_at, created_at
         FROM reservations
         WHERE table_id = ? AND status = 'ACTIVE' AND expires_at > ?",
    )
    .bind(table_id)
    .bind(now)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

/// ACTIVE reservation owned by a specific user (cancel path)
pub async fn find_active_owned<'e, E>(
    db: E,
    id: &str,
    user_id: &str,
) -> RepoResult<Option<Reservation>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, table_id, status, expires_at, created_at
         FROM reservations
         WHERE id = ? AND user_id = ? AND status = 'ACTIVE'",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

pub async fn find_by_user<'e, E>(db: E, user_id: &str) -> RepoResult<Vec<ReservationView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ReservationViewRow>(&format!(
        "{VIEW_SELECT} WHERE r.user_id = ? ORDER BY r.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(ReservationView::from).collect())
}

pub async fn set_status<'e, E>(db: E, id: &str, status: ReservationStatus) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE reservations SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Mark every over-deadline ACTIVE reservation EXPIRED in one statement.
///
/// Returns the expired rows so the caller can free the tables inside the
/// same transaction. Running this twice for the same `now` is a no-op.
pub async fn expire_before<'e, E>(db: E, now: i64) -> RepoResult<Vec<Reservation>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let expired = sqlx::query_as::<_, Reservation>(
        "UPDATE reservations SET status = 'EXPIRED'
         WHERE status = 'ACTIVE' AND expires_at <= ?
         RETURNING id, user_id, table_id, status, expires_at, created_at",
    )
    .bind(now)
    .fetch_all(db)
    .await?;
    Ok(expired)
}

pub async fn delete<'e, E>(db: E, id: &str) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
