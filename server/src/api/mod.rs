//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 用户目录接口
//! - [`tables`] - 桌台管理接口
//! - [`reservations`] - 预订管理接口
//! - [`orders`] - 订单管理接口
//! - [`queue`] - 排队管理接口

pub mod extract;

pub mod health;
pub mod orders;
pub mod queue;
pub mod reservations;
pub mod tables;
pub mod users;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble all domain routers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(orders::router())
        .merge(queue::router())
}
