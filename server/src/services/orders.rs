//! Order Manager
//!
//! Orders require an already-occupied table: creation is a pure
//! precondition check and never performs the FREE→OCCUPIED transition
//! itself. Completing an order sends the table to WAITING_CLEANUP;
//! cancelling one frees it.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbService;
use crate::db::models::{
    self, Order, OrderItem, OrderItemInput, OrderStatus, OrderUpdate, OrderView, TableStatus,
};
use crate::db::repository::{RepoError, orders, tables, users};
use crate::gateway::Notifier;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct OrdersService {
    db: DbService,
    notifier: Notifier,
}

impl OrdersService {
    pub fn new(db: DbService, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    fn validate_items(inputs: Vec<OrderItemInput>) -> AppResult<Vec<OrderItem>> {
        if inputs.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }
        for item in &inputs {
            if item.quantity == 0 {
                return Err(AppError::validation(format!(
                    "Item '{}' has zero quantity",
                    item.name
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Item '{}' has a negative price",
                    item.name
                )));
            }
        }
        Ok(inputs.into_iter().map(OrderItemInput::into_item).collect())
    }

    /// Create an order against an occupied table. The total is computed
    /// server-side; table status is deliberately left unchanged.
    pub async fn create(
        &self,
        table_id: &str,
        items: Vec<OrderItemInput>,
        user_id: &str,
    ) -> AppResult<OrderView> {
        let items = Self::validate_items(items)?;
        let now = now_millis();
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let user = users::summary(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        let table = tables::find_by_id(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::invalid("Table not found"))?;
        if table.status == TableStatus::Free {
            return Err(AppError::invalid("Table is not occupied"));
        }
        if orders::find_active_for_table(&mut *tx, table_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Table already has an active order"));
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            table_id: table_id.to_string(),
            status: OrderStatus::Pending,
            total: models::order::total_of(&items),
            items,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = orders::insert(&mut *tx, &order).await {
            return Err(match e {
                RepoError::Duplicate(_) => AppError::conflict("Table already has an active order"),
                other => other.into(),
            });
        }
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.orders_changed().await;

        Ok(OrderView {
            id: order.id,
            user,
            table,
            status: order.status,
            items: order.items,
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    /// Replace the line items; total is recomputed. No table side effect.
    pub async fn update(&self, id: &str, patch: OrderUpdate) -> AppResult<OrderView> {
        let pool = self.db.pool();
        if let Some(inputs) = patch.items {
            let items = Self::validate_items(inputs)?;
            let total = models::order::total_of(&items);
            if !orders::update_items(pool, id, &items, total, now_millis()).await? {
                return Err(AppError::not_found(format!("Order {id} not found")));
            }
        }
        let view = self.get(id).await?;
        self.notifier.orders_changed().await;
        Ok(view)
    }

    /// Direct status write; no table side effect
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> AppResult<OrderView> {
        if !orders::set_status(self.db.pool(), id, status, now_millis()).await? {
            return Err(AppError::not_found(format!("Order {id} not found")));
        }
        let view = self.get(id).await?;
        self.notifier.orders_changed().await;
        Ok(view)
    }

    /// Deliver the order and send the table to cleanup
    pub async fn complete(&self, id: &str) -> AppResult<Order> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let order = orders::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        orders::set_status(&mut *tx, id, OrderStatus::Delivered, now_millis()).await?;
        tables::set_status(&mut *tx, &order.table_id, TableStatus::WaitingCleanup).await?;
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.orders_changed().await;
        self.notifier.tables_changed().await;

        Ok(Order {
            status: OrderStatus::Delivered,
            ..order
        })
    }

    /// Cancel the order and free the table
    pub async fn cancel(&self, id: &str) -> AppResult<Order> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let order = orders::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        orders::set_status(&mut *tx, id, OrderStatus::Cancelled, now_millis()).await?;
        tables::set_status(&mut *tx, &order.table_id, TableStatus::Free).await?;
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.orders_changed().await;
        self.notifier.tables_changed().await;
        self.notifier.table_available(&order.table_id);

        Ok(Order {
            status: OrderStatus::Cancelled,
            ..order
        })
    }

    /// Hard delete (administrative correction); no table side effect
    pub async fn remove(&self, id: &str) -> AppResult<bool> {
        if !orders::delete(self.db.pool(), id).await? {
            return Err(AppError::not_found(format!("Order {id} not found")));
        }
        self.notifier.orders_changed().await;
        Ok(true)
    }

    /// Orders still moving through the kitchen, newest first
    pub async fn find_all(&self) -> AppResult<Vec<OrderView>> {
        Ok(orders::find_active(self.db.pool()).await?)
    }

    pub async fn find_by_table(&self, table_id: &str) -> AppResult<Vec<OrderView>> {
        Ok(orders::find_by_table(self.db.pool(), table_id).await?)
    }

    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<OrderView>> {
        Ok(orders::find_by_user(self.db.pool(), user_id).await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<OrderView> {
        orders::find_view_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))
    }
}
