//! 订单生命周期集成测试
//!
//! 下单前置条件、单桌单订单、总价计算、厨房状态推进与桌台联动。

mod common;

use comanda_server::AppError;
use comanda_server::db::models::{OrderStatus, OrderUpdate, TableStatus};
use common::{item, seed_table, seed_user, spawn};
use rust_decimal::Decimal;
use std::str::FromStr;

async fn occupied_table(app: &common::TestApp, number: i64) -> String {
    let table = seed_table(&app.state, number, 4).await;
    app.state
        .tables
        .set_status(&table.id, TableStatus::Occupied)
        .await
        .expect("occupy table");
    table.id
}

async fn table_status(app: &common::TestApp, table_id: &str) -> TableStatus {
    app.state
        .tables
        .get(table_id)
        .await
        .expect("table lookup")
        .table
        .status
}

#[tokio::test]
async fn order_against_a_free_table_is_rejected() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let err = app
        .state
        .orders
        .create(&table.id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect_err("FREE table cannot take an order");
    assert!(matches!(err, AppError::Invalid(_)), "got {err:?}");
}

#[tokio::test]
async fn create_computes_the_total_server_side() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let order = app
        .state
        .orders
        .create(
            &table_id,
            vec![item("Pasta", "12.50", 2), item("Espresso", "3.00", 1)],
            &user.id,
        )
        .await
        .expect("order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Decimal::from_str("28.00").unwrap());
    assert_eq!(order.items.len(), 2);
    // 下单不改变桌台状态
    assert_eq!(table_status(&app, &table_id).await, TableStatus::Occupied);
}

#[tokio::test]
async fn a_table_holds_at_most_one_open_order() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    app.state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("first order");

    let err = app
        .state
        .orders
        .create(&table_id, vec![item("Pizza", "10.00", 1)], &user.id)
        .await
        .expect_err("second open order must conflict");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn item_validation_rejects_empty_and_zero_quantity() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let err = app
        .state
        .orders
        .create(&table_id, vec![], &user.id)
        .await
        .expect_err("empty order");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let err = app
        .state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 0)], &user.id)
        .await
        .expect_err("zero quantity");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn update_replaces_items_and_recomputes_the_total() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let order = app
        .state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("order");

    let updated = app
        .state
        .orders
        .update(
            &order.id,
            OrderUpdate {
                items: Some(vec![item("Pizza", "10.00", 3)]),
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.total, Decimal::from_str("30.00").unwrap());
}

#[tokio::test]
async fn kitchen_status_advances_without_touching_the_table() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let order = app
        .state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("order");

    for status in [OrderStatus::InPreparation, OrderStatus::Ready] {
        let view = app
            .state
            .orders
            .update_status(&order.id, status)
            .await
            .expect("status update");
        assert_eq!(view.status, status);
        assert_eq!(table_status(&app, &table_id).await, TableStatus::Occupied);
    }
}

#[tokio::test]
async fn complete_delivers_and_sends_the_table_to_cleanup() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let order = app
        .state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("order");

    let completed = app.state.orders.complete(&order.id).await.expect("complete");
    assert_eq!(completed.status, OrderStatus::Delivered);
    assert_eq!(
        table_status(&app, &table_id).await,
        TableStatus::WaitingCleanup
    );

    // 送达之后这张桌台可以接新订单（清理完成后）
    app.state
        .tables
        .set_status(&table_id, TableStatus::Occupied)
        .await
        .expect("re-occupy after cleanup");
    app.state
        .orders
        .create(&table_id, vec![item("Espresso", "3.00", 1)], &user.id)
        .await
        .expect("delivered order no longer blocks the table");
}

#[tokio::test]
async fn cancel_frees_the_table() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table_id = occupied_table(&app, 1).await;

    let order = app
        .state
        .orders
        .create(&table_id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("order");

    let cancelled = app.state.orders.cancel(&order.id).await.expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(table_status(&app, &table_id).await, TableStatus::Free);
}
