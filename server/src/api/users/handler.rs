//! User Directory API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserSummary};
use crate::db::repository::{RepoError, users};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// POST /api/users - 创建用户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("User name must not be empty"));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::validation("User email must not be empty"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        created_at: now_millis(),
    };

    match users::insert(state.db.pool(), &user).await {
        Ok(()) => Ok(Json(user)),
        Err(RepoError::Duplicate(_)) => Err(AppError::conflict(format!(
            "User with email {} already exists",
            user.email
        ))),
        Err(other) => Err(other.into()),
    }
}

/// GET /api/users - 获取用户目录
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserSummary>>> {
    let users = users::find_all(state.db.pool()).await?;
    Ok(Json(users))
}

/// GET /api/users/:id - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserSummary>> {
    let user = users::summary(state.db.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(user))
}
