//! Waiting Queue
//!
//! FIFO list of walk-in users. Positions are dense and 1-based: joins
//! append at max+1, removals close the gap by shifting every later
//! entry forward. Renumbering is the most race-prone routine in the
//! system, so all mutations additionally serialize on a queue-wide
//! async lock on top of their transaction.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::DbService;
use crate::db::models::{QueueEntry, QueueEntryView, QueuePosition};
use crate::db::repository::{RepoError, queue, users};
use crate::gateway::Notifier;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct QueueService {
    db: DbService,
    notifier: Notifier,
    lock: Arc<Mutex<()>>,
}

impl QueueService {
    pub fn new(db: DbService, notifier: Notifier) -> Self {
        Self {
            db,
            notifier,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Join at the tail of the queue. A user holds at most one entry.
    pub async fn join(&self, user_id: &str) -> AppResult<QueueEntryView> {
        let guard = self.lock.lock().await;
        let pool = self.db.pool();

        let user = users::summary(pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        if queue::find_by_user(pool, user_id).await?.is_some() {
            return Err(AppError::conflict("User is already in the queue"));
        }

        let id = Uuid::new_v4().to_string();
        let now = now_millis();
        let position = match queue::insert_next(pool, &id, user_id, now).await {
            Ok(position) => position,
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::conflict("User is already in the queue"));
            }
            Err(other) => return Err(other.into()),
        };
        let total = queue::len(pool).await?;
        drop(guard);

        self.notifier.queue_changed().await;
        self.notifier.queue_position(user_id, position, total);

        Ok(QueueEntryView {
            id,
            user,
            position,
            created_at: now,
        })
    }

    /// Leave the queue, renumbering everyone behind the removed entry
    pub async fn leave(&self, user_id: &str) -> AppResult<QueueEntry> {
        let guard = self.lock.lock().await;
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let entry = queue::delete_by_user(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User is not in the queue"))?;
        queue::close_gap(&mut *tx, entry.position).await?;
        tx.commit().await.map_err(RepoError::from)?;
        drop(guard);

        self.notifier.queue_changed().await;
        Ok(entry)
    }

    /// Pop the front entry, if any. Called once a table becomes FREE.
    pub async fn serve_next(&self) -> AppResult<Option<QueueEntryView>> {
        let guard = self.lock.lock().await;
        let mut tx = self.db.pool().begin().await.map_err(RepoError::from)?;

        let Some(front) = queue::front(&mut *tx).await? else {
            return Ok(None);
        };
        let user = users::summary(&mut *tx, &front.user_id)
            .await?
            .ok_or_else(|| AppError::internal("Queue entry owner row missing"))?;
        queue::delete_by_user(&mut *tx, &front.user_id).await?;
        queue::close_gap(&mut *tx, front.position).await?;
        tx.commit().await.map_err(RepoError::from)?;
        drop(guard);

        self.notifier.queue_changed().await;
        self.notifier
            .user_notify(&front.user_id, "table-available", serde_json::json!({}));

        Ok(Some(QueueEntryView {
            id: front.id,
            user,
            position: front.position,
            created_at: front.created_at,
        }))
    }

    /// Front of the queue without removing it
    pub async fn peek_next(&self) -> AppResult<Option<QueueEntryView>> {
        let pool = self.db.pool();
        let Some(front) = queue::front(pool).await? else {
            return Ok(None);
        };
        let user = users::summary(pool, &front.user_id)
            .await?
            .ok_or_else(|| AppError::internal("Queue entry owner row missing"))?;
        Ok(Some(QueueEntryView {
            id: front.id,
            user,
            position: front.position,
            created_at: front.created_at,
        }))
    }

    /// A user's rank, recomputed as (entries ahead + 1) rather than read
    /// from the stored position, so it self-heals if numbering drifts.
    pub async fn position(&self, user_id: &str) -> AppResult<QueuePosition> {
        let pool = self.db.pool();
        let entry = queue::find_by_user(pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User is not in the queue"))?;
        let user = users::summary(pool, user_id)
            .await?
            .ok_or_else(|| AppError::internal("Queue entry owner row missing"))?;
        let ahead = queue::rank(pool, entry.position).await?;
        let total = queue::len(pool).await?;

        Ok(QueuePosition {
            id: entry.id,
            user,
            position: ahead + 1,
            total_in_queue: total,
            created_at: entry.created_at,
        })
    }

    /// The whole queue in position order
    pub async fn list(&self) -> AppResult<Vec<QueueEntryView>> {
        Ok(queue::list(self.db.pool()).await?)
    }
}
