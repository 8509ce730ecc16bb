//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::extract::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationUpdate, ReservationView};
use crate::utils::AppResult;

/// POST /api/reservations - 预订一张空闲桌台
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<ReservationView>> {
    let reservation = state
        .reservations
        .create(&payload.table_id, &user.id)
        .await?;
    Ok(Json(reservation))
}

/// GET /api/reservations - 获取所有预订
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ReservationView>>> {
    let reservations = state.reservations.find_all().await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/my - 获取当前用户的预订
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<ReservationView>>> {
    let reservations = state.reservations.find_by_user(&user.id).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReservationView>> {
    let reservation = state.reservations.get(&id).await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/:id/cancel - 取消自己的预订，桌台回到 FREE
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.reservations.cancel(&id, &user.id).await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/:id/complete - 预订履约（顾客到店），员工入口
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.reservations.complete(&id).await?;
    Ok(Json(reservation))
}

/// PATCH /api/reservations/:id - 更新预订
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<ReservationView>> {
    let reservation = state.reservations.update(&id, payload).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/:id - 删除预订记录
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.reservations.remove(&id).await?;
    Ok(Json(result))
}
