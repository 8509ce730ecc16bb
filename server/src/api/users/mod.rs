//! User Directory API 模块
//!
//! 最小用户目录：预订/订单/排队都以用户 ID 为主体，
//! 认证本身由上游网关负责。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
}
