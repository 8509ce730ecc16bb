//! Dining Table Repository

use sqlx::{Sqlite, SqlitePool};
use std::collections::HashMap;

use super::{RepoResult, orders, reservations};
use crate::db::models::{DiningTable, TableOverview, TableStatus};
use crate::utils::time::now_millis;

pub async fn insert<'e, E>(db: E, table: &DiningTable) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO dining_tables (id, number, capacity, status, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&table.id)
    .bind(table.number)
    .bind(table.capacity)
    .bind(table.status)
    .bind(table.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<DiningTable>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, status, created_at FROM dining_tables WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(table)
}

pub async fn find_all<'e, E>(db: E) -> RepoResult<Vec<DiningTable>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, status, created_at FROM dining_tables ORDER BY number",
    )
    .fetch_all(db)
    .await?;
    Ok(tables)
}

/// Tables currently FREE
pub async fn find_available<'e, E>(db: E) -> RepoResult<Vec<DiningTable>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, status, created_at FROM dining_tables
         WHERE status = 'FREE' ORDER BY number",
    )
    .fetch_all(db)
    .await?;
    Ok(tables)
}

pub async fn update<'e, E>(db: E, table: &DiningTable) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE dining_tables SET number = ?, capacity = ? WHERE id = ?")
        .bind(table.number)
        .bind(table.capacity)
        .bind(&table.id)
        .execute(db)
        .await?;
    Ok(())
}

/// Unconditional status write. Precondition checks live in the services.
pub async fn set_status<'e, E>(db: E, id: &str, status: TableStatus) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE dining_tables SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e, E>(db: E, id: &str) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All tables with their active reservation/order attached.
///
/// Three queries stitched in memory; restaurant-scale row counts make
/// this cheaper than a wide multi-join.
pub async fn overviews(pool: &SqlitePool) -> RepoResult<Vec<TableOverview>> {
    let tables = find_all(pool).await?;
    let now = now_millis();

    let mut holds: HashMap<String, _> = reservations::find_active(pool, now)
        .await?
        .into_iter()
        .map(|r| (r.table.id.clone(), r))
        .collect();
    let mut open_orders: HashMap<String, _> = orders::find_active(pool)
        .await?
        .into_iter()
        .map(|o| (o.table.id.clone(), o))
        .collect();

    Ok(tables
        .into_iter()
        .map(|table| {
            let reservation = holds.remove(&table.id).map(|r| r.into_summary());
            let order = open_orders.remove(&table.id).map(|o| o.into_summary());
            TableOverview {
                table,
                reservation,
                order,
            }
        })
        .collect())
}
