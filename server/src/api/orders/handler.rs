//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::extract::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderUpdate, OrderView};
use crate::utils::AppResult;

/// POST /api/orders - 针对占用中的桌台下单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderView>> {
    let order = state
        .orders
        .create(&payload.table_id, payload.items, &user.id)
        .await?;
    Ok(Json(order))
}

/// GET /api/orders - 获取所有订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderView>>> {
    let orders = state.orders.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/my - 获取当前用户的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = state.orders.find_by_user(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/table/:table_id - 获取指定桌台的订单
pub async fn list_by_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = state.orders.find_by_table(&table_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let order = state.orders.get(&id).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id - 替换订单条目，重算总价
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<OrderView>> {
    let order = state.orders.update(&id, payload).await?;
    Ok(Json(order))
}

/// Status write payload
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// PATCH /api/orders/:id/status - 推进厨房状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<OrderView>> {
    let order = state.orders.update_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/complete - 订单送达，桌台转入待清理
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.complete(&id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel - 取消订单，释放桌台
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.cancel(&id).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除订单记录
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.orders.remove(&id).await?;
    Ok(Json(result))
}
