//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableOverview, TableStatusUpdate,
};
use crate::utils::AppResult;

/// GET /api/tables - 获取所有桌台（含当前预订/订单概览）
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TableOverview>>> {
    let tables = state.tables.list_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/available - 获取空闲桌台
pub async fn list_available(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.list_available().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableOverview>> {
    let table = state.tables.get(&id).await?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.create(payload).await?;
    Ok(Json(table))
}

/// PATCH /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.update(&id, payload).await?;
    Ok(Json(table))
}

/// PATCH /api/tables/:id/status - 无条件写桌台状态（员工修正入口）
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.set_status(&id, payload.status).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.tables.delete(&id).await?;
    Ok(Json(result))
}
