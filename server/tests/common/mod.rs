//! 集成测试共用脚手架
//!
//! 每个测试拿到一个独立的临时目录和全新的 SQLite 数据库，
//! 通过 `ServerState::initialize` 完整初始化（不启动 HTTP 监听）。

#![allow(dead_code)]

use comanda_server::db::models::{DiningTable, DiningTableCreate, OrderItemInput, User};
use comanda_server::db::repository::users;
use comanda_server::utils::time::now_millis;
use comanda_server::{Config, ServerState};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

pub struct TestApp {
    pub state: ServerState,
    // 目录随 TestApp 一起存活，drop 时自动清理
    _dir: TempDir,
}

pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.reservation_ttl_minutes = 15;
    let state = ServerState::initialize(&config).await;
    TestApp { state, _dir: dir }
}

pub async fn seed_user(state: &ServerState, name: &str) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        created_at: now_millis(),
    };
    users::insert(state.db.pool(), &user)
        .await
        .expect("failed to seed user");
    user
}

pub async fn seed_table(state: &ServerState, number: i64, capacity: i64) -> DiningTable {
    state
        .tables
        .create(DiningTableCreate { number, capacity })
        .await
        .expect("failed to seed table")
}

pub fn item(name: &str, price: &str, quantity: u32) -> OrderItemInput {
    OrderItemInput {
        name: name.to_string(),
        price: Decimal::from_str(price).expect("bad price literal"),
        quantity,
        note: None,
    }
}
