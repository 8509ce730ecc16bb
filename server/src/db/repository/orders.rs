//! Order Repository
//!
//! Line items are stored as a JSON column and the total as a decimal
//! string; both are (de)serialized at this boundary so the rest of the
//! code only sees [`Order`] / [`OrderView`].

use rust_decimal::Decimal;
use sqlx::Sqlite;
use std::str::FromStr;

use super::{RepoError, RepoResult};
use crate::db::models::{
    DiningTable, Order, OrderItem, OrderStatus, OrderView, TableStatus, UserSummary,
};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    table_id: String,
    status: OrderStatus,
    items: String,
    total: String,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self) -> RepoResult<Order> {
        let items: Vec<OrderItem> = serde_json::from_str(&self.items)?;
        let total = Decimal::from_str(&self.total)
            .map_err(|e| RepoError::Database(format!("Corrupt total column: {e}")))?;
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            table_id: self.table_id,
            status: self.status,
            items,
            total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderViewRow {
    id: String,
    user_id: String,
    table_id: String,
    status: OrderStatus,
    items: String,
    total: String,
    created_at: i64,
    updated_at: i64,
    user_name: String,
    user_email: String,
    table_number: i64,
    table_capacity: i64,
    table_status: TableStatus,
    table_created_at: i64,
}

impl OrderViewRow {
    fn into_view(self) -> RepoResult<OrderView> {
        let items: Vec<OrderItem> = serde_json::from_str(&self.items)?;
        let total = Decimal::from_str(&self.total)
            .map_err(|e| RepoError::Database(format!("Corrupt total column: {e}")))?;
        Ok(OrderView {
            id: self.id,
            user: UserSummary {
                id: self.user_id,
                name: self.user_name,
                email: self.user_email,
            },
            table: DiningTable {
                id: self.table_id,
                number: self.table_number,
                capacity: self.table_capacity,
                status: self.table_status,
                created_at: self.table_created_at,
            },
            status: self.status,
            items,
            total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const VIEW_SELECT: &str = "SELECT o.id, o.user_id, o.table_id, o.status, o.items, o.total, o.created_at, o.updated_at,
        u.name AS user_name, u.email AS user_email,
        t.number AS table_number, t.capacity AS table_capacity,
        t.status AS table_status, t.created_at AS table_created_at
 FROM orders o
 JOIN users u ON u.id = o.user_id
 JOIN dining_tables t ON t.id = o.table_id";

fn views(rows: Vec<OrderViewRow>) -> RepoResult<Vec<OrderView>> {
    rows.into_iter().map(OrderViewRow::into_view).collect()
}

pub async fn insert<'e, E>(db: E, order: &Order) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items = serde_json::to_string(&order.items)?;
    sqlx::query(
        "INSERT INTO orders (id, user_id, table_id, status, items, total, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(&order.table_id)
    .bind(order.status)
    .bind(items)
    .bind(order.total.to_string())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<Order>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, table_id, status, items, total, created_at, updated_at
         FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn find_view_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<OrderView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, OrderViewRow>(&format!("{VIEW_SELECT} WHERE o.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    row.map(OrderViewRow::into_view).transpose()
}

/// Orders still moving through the kitchen (PENDING/IN_PREPARATION/READY)
pub async fn find_active<'e, E>(db: E) -> RepoResult<Vec<OrderView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, OrderViewRow>(&format!(
        "{VIEW_SELECT} WHERE o.status IN ('PENDING', 'IN_PREPARATION', 'READY')
         ORDER BY o.created_at DESC"
    ))
    .fetch_all(db)
    .await?;
    views(rows)
}

/// The open order on a table, if any
pub async fn find_active_for_table<'e, E>(db: E, table_id: &str) -> RepoResult<Option<Order>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, table_id, status, items, total, created_at, updated_at
         FROM orders
         WHERE table_id = ? AND status IN ('PENDING', 'IN_PREPARATION', 'READY')",
    )
    .bind(table_id)
    .fetch_optional(db)
    .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn find_by_table<'e, E>(db: E, table_id: &str) -> RepoResult<Vec<OrderView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, OrderViewRow>(&format!(
        "{VIEW_SELECT} WHERE o.table_id = ? ORDER BY o.created_at DESC"
    ))
    .bind(table_id)
    .fetch_all(db)
    .await?;
    views(rows)
}

pub async fn find_by_user<'e, E>(db: E, user_id: &str) -> RepoResult<Vec<OrderView>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, OrderViewRow>(&format!(
        "{VIEW_SELECT} WHERE o.user_id = ? ORDER BY o.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    views(rows)
}

/// Replace line items and total
pub async fn update_items<'e, E>(
    db: E,
    id: &str,
    items: &[OrderItem],
    total: Decimal,
    updated_at: i64,
) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items = serde_json::to_string(items)?;
    let result =
        sqlx::query("UPDATE orders SET items = ?, total = ?, updated_at = ? WHERE id = ?")
            .bind(items)
            .bind(total.to_string())
            .bind(updated_at)
            .bind(id)
            .execute(db)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_status<'e, E>(
    db: E,
    id: &str,
    status: OrderStatus,
    updated_at: i64,
) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e, E>(db: E, id: &str) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
