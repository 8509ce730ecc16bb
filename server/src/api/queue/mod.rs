//! Waiting Queue API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/queue", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/join", post(handler::join))
        .route("/leave", delete(handler::leave))
        .route("/my-position", get(handler::my_position))
        .route("/next", get(handler::peek_next))
        .route("/notify-next", post(handler::notify_next))
}
