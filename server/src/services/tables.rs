//! Table Registry
//!
//! Owns table records and exposes the unconditional `set_status` write.
//! Transition guards deliberately live in the calling managers — the
//! legal predecessor states depend on which manager drives the
//! transition, so the registry stays a simple store.

use crate::db::DbService;
use crate::db::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, OrderSummary, ReservationSummary,
    TableOverview, TableStatus,
};
use crate::db::repository::{RepoError, orders, reservations, tables, users};
use crate::gateway::Notifier;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TablesService {
    db: DbService,
    notifier: Notifier,
}

impl TablesService {
    pub fn new(db: DbService, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    pub async fn create(&self, data: DiningTableCreate) -> AppResult<DiningTable> {
        if data.capacity <= 0 {
            return Err(AppError::validation("Capacity must be positive"));
        }

        let table = DiningTable {
            id: Uuid::new_v4().to_string(),
            number: data.number,
            capacity: data.capacity,
            status: TableStatus::Free,
            created_at: now_millis(),
        };

        if let Err(e) = tables::insert(self.db.pool(), &table).await {
            return Err(match e {
                RepoError::Duplicate(_) => {
                    AppError::conflict(format!("Table number {} already exists", data.number))
                }
                other => other.into(),
            });
        }

        self.notifier.tables_changed().await;
        Ok(table)
    }

    /// All tables with nested active reservation/order summaries
    pub async fn list_all(&self) -> AppResult<Vec<TableOverview>> {
        Ok(tables::overviews(self.db.pool()).await?)
    }

    pub async fn list_available(&self) -> AppResult<Vec<DiningTable>> {
        Ok(tables::find_available(self.db.pool()).await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<TableOverview> {
        let pool = self.db.pool();
        let table = tables::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;

        let reservation = match reservations::find_active_for_table(pool, id, now_millis()).await? {
            Some(r) => {
                let user = users::summary(pool, &r.user_id)
                    .await?
                    .ok_or_else(|| AppError::internal("Reservation owner row missing"))?;
                Some(ReservationSummary {
                    id: r.id,
                    user,
                    status: r.status,
                    expires_at: r.expires_at,
                })
            }
            None => None,
        };

        let order = match orders::find_active_for_table(pool, id).await? {
            Some(o) => {
                let user = users::summary(pool, &o.user_id)
                    .await?
                    .ok_or_else(|| AppError::internal("Order owner row missing"))?;
                Some(OrderSummary {
                    id: o.id,
                    user,
                    status: o.status,
                    total: o.total,
                })
            }
            None => None,
        };

        Ok(TableOverview {
            table,
            reservation,
            order,
        })
    }

    pub async fn update(&self, id: &str, patch: DiningTableUpdate) -> AppResult<DiningTable> {
        let pool = self.db.pool();
        let existing = tables::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;

        let updated = DiningTable {
            number: patch.number.unwrap_or(existing.number),
            capacity: patch.capacity.unwrap_or(existing.capacity),
            ..existing
        };
        if updated.capacity <= 0 {
            return Err(AppError::validation("Capacity must be positive"));
        }

        if let Err(e) = tables::update(pool, &updated).await {
            return Err(match e {
                RepoError::Duplicate(_) => {
                    AppError::conflict(format!("Table number {} already exists", updated.number))
                }
                other => other.into(),
            });
        }

        self.notifier.tables_changed().await;
        Ok(updated)
    }

    /// Unconditional status write — used by the managers after they have
    /// validated their own precondition, and by the cleanup-done trigger.
    pub async fn set_status(&self, id: &str, status: TableStatus) -> AppResult<DiningTable> {
        let pool = self.db.pool();
        if !tables::set_status(pool, id, status).await? {
            return Err(AppError::not_found(format!("Table {id} not found")));
        }
        let table = tables::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;

        self.notifier.tables_changed().await;
        if status == TableStatus::Free {
            self.notifier.table_available(id);
        }
        Ok(table)
    }

    /// Delete a table. Refused while an active reservation or order
    /// still references it.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        if reservations::find_active_for_table(&mut *tx, id, now_millis())
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Table has an active reservation and cannot be deleted",
            ));
        }
        if orders::find_active_for_table(&mut *tx, id).await?.is_some() {
            return Err(AppError::conflict(
                "Table has an active order and cannot be deleted",
            ));
        }
        if !tables::delete(&mut *tx, id).await? {
            return Err(AppError::not_found(format!("Table {id} not found")));
        }

        tx.commit().await.map_err(RepoError::from)?;
        self.notifier.tables_changed().await;
        Ok(true)
    }
}
