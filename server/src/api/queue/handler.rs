//! Waiting Queue API Handlers

use axum::{Json, extract::State};

use crate::api::extract::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{QueueEntry, QueueEntryView, QueuePosition};
use crate::utils::AppResult;

/// POST /api/queue/join - 排到队尾
pub async fn join(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<QueueEntryView>> {
    let entry = state.queue.join(&user.id).await?;
    Ok(Json(entry))
}

/// DELETE /api/queue/leave - 离开队列，后面的人依次前移
pub async fn leave(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<QueueEntry>> {
    let entry = state.queue.leave(&user.id).await?;
    Ok(Json(entry))
}

/// GET /api/queue - 按位置排列的完整队列
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<QueueEntryView>>> {
    let entries = state.queue.list().await?;
    Ok(Json(entries))
}

/// GET /api/queue/my-position - 当前用户的排名
pub async fn my_position(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<QueuePosition>> {
    let position = state.queue.position(&user.id).await?;
    Ok(Json(position))
}

/// GET /api/queue/next - 查看队首（不出队）
pub async fn peek_next(
    State(state): State<ServerState>,
) -> AppResult<Json<Option<QueueEntryView>>> {
    let entry = state.queue.peek_next().await?;
    Ok(Json(entry))
}

/// POST /api/queue/notify-next - 队首出队并收到到桌通知，员工入口
pub async fn notify_next(
    State(state): State<ServerState>,
) -> AppResult<Json<Option<QueueEntryView>>> {
    let entry = state.queue.serve_next().await?;
    Ok(Json(entry))
}
