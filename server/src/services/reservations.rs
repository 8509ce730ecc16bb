//! Reservation Manager
//!
//! Creates, cancels, completes and expires the time-boxed holds on
//! tables. Every mutation runs in one transaction: validate table
//! status, write the reservation, move the table — so two racing
//! requests can never both observe FREE and both succeed. The partial
//! unique index on active reservations is the second line of defense.

use uuid::Uuid;

use crate::db::DbService;
use crate::db::models::{
    DiningTable, Reservation, ReservationStatus, ReservationUpdate, ReservationView, TableStatus,
};
use crate::db::repository::{RepoError, reservations, tables, users};
use crate::gateway::Notifier;
use crate::utils::time::{minutes_to_millis, now_millis};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ReservationsService {
    db: DbService,
    notifier: Notifier,
    ttl_millis: i64,
}

impl ReservationsService {
    pub fn new(db: DbService, notifier: Notifier, ttl_minutes: i64) -> Self {
        Self {
            db,
            notifier,
            ttl_millis: minutes_to_millis(ttl_minutes),
        }
    }

    /// Place a hold on a FREE table. Expires after the configured TTL
    /// (15 minutes by default).
    pub async fn create(&self, table_id: &str, user_id: &str) -> AppResult<ReservationView> {
        let now = now_millis();
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let user = users::summary(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        let table = tables::find_by_id(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::invalid("Table not found"))?;
        if table.status != TableStatus::Free {
            return Err(AppError::conflict("Table is not available"));
        }
        // Defensive double-check against races; the unique index backstops it.
        if reservations::find_active_for_table(&mut *tx, table_id, now)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Table already has an active reservation"));
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            table_id: table_id.to_string(),
            status: ReservationStatus::Active,
            expires_at: now + self.ttl_millis,
            created_at: now,
        };
        if let Err(e) = reservations::insert(&mut *tx, &reservation).await {
            return Err(match e {
                RepoError::Duplicate(_) => {
                    AppError::conflict("Table already has an active reservation")
                }
                other => other.into(),
            });
        }
        tables::set_status(&mut *tx, table_id, TableStatus::Reserved).await?;
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.reservations_changed().await;
        self.notifier.tables_changed().await;

        Ok(ReservationView {
            id: reservation.id,
            user,
            table: DiningTable {
                status: TableStatus::Reserved,
                ..table
            },
            status: reservation.status,
            expires_at: reservation.expires_at,
            created_at: reservation.created_at,
        })
    }

    /// Cancel an ACTIVE reservation owned by `user_id`, freeing the table
    pub async fn cancel(&self, id: &str, user_id: &str) -> AppResult<Reservation> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let reservation = reservations::find_active_owned(&mut *tx, id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found or already cancelled"))?;
        reservations::set_status(&mut *tx, id, ReservationStatus::Cancelled).await?;
        tables::set_status(&mut *tx, &reservation.table_id, TableStatus::Free).await?;
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.reservations_changed().await;
        self.notifier.tables_changed().await;
        self.notifier.table_available(&reservation.table_id);

        Ok(Reservation {
            status: ReservationStatus::Cancelled,
            ..reservation
        })
    }

    /// Mark the party as seated and done; frees the table
    pub async fn complete(&self, id: &str) -> AppResult<Reservation> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let reservation = reservations::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;
        reservations::set_status(&mut *tx, id, ReservationStatus::Completed).await?;
        tables::set_status(&mut *tx, &reservation.table_id, TableStatus::Free).await?;
        tx.commit().await.map_err(RepoError::from)?;

        self.notifier.reservations_changed().await;
        self.notifier.tables_changed().await;
        self.notifier.table_available(&reservation.table_id);

        Ok(Reservation {
            status: ReservationStatus::Completed,
            ..reservation
        })
    }

    /// Periodic expiry sweep: every ACTIVE reservation past its deadline
    /// becomes EXPIRED and its table returns to FREE. Returns the number
    /// of reservations processed. Idempotent — a second run (or a
    /// concurrent one) finds nothing left to expire.
    pub async fn expire_sweep(&self) -> AppResult<usize> {
        self.expire_at(now_millis()).await
    }

    /// Sweep against an explicit clock, for deterministic testing
    pub async fn expire_at(&self, now: i64) -> AppResult<usize> {
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let expired = reservations::expire_before(&mut *tx, now).await?;
        for reservation in &expired {
            tables::set_status(&mut *tx, &reservation.table_id, TableStatus::Free).await?;
        }
        tx.commit().await.map_err(RepoError::from)?;

        if !expired.is_empty() {
            self.notifier.reservations_changed().await;
            self.notifier.tables_changed().await;
            for reservation in &expired {
                self.notifier.table_available(&reservation.table_id);
            }
        }
        Ok(expired.len())
    }

    /// Currently active, unexpired reservations
    pub async fn find_all(&self) -> AppResult<Vec<ReservationView>> {
        Ok(reservations::find_active(self.db.pool(), now_millis()).await?)
    }

    /// A user's reservation history, newest first
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<ReservationView>> {
        Ok(reservations::find_by_user(self.db.pool(), user_id).await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<ReservationView> {
        reservations::find_view_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))
    }

    /// Administrative field correction; no table side effect
    pub async fn update(&self, id: &str, patch: ReservationUpdate) -> AppResult<ReservationView> {
        if let Some(status) = patch.status
            && !reservations::set_status(self.db.pool(), id, status).await?
        {
            return Err(AppError::not_found(format!("Reservation {id} not found")));
        }
        let view = self.get(id).await?;
        self.notifier.reservations_changed().await;
        Ok(view)
    }

    /// Hard delete (administrative correction); no table side effect
    pub async fn remove(&self, id: &str) -> AppResult<bool> {
        if !reservations::delete(self.db.pool(), id).await? {
            return Err(AppError::not_found(format!("Reservation {id} not found")));
        }
        self.notifier.reservations_changed().await;
        Ok(true)
    }
}
