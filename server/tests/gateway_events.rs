//! 广播事件集成测试
//!
//! 订阅总线后执行变更，验证对应频道上能观察到事件。

mod common;

use std::time::Duration;

use comanda_server::GatewayMessage;
use comanda_server::db::models::TableStatus;
use common::{item, seed_table, seed_user, spawn};
use tokio::sync::broadcast;

/// 等待直到收到指定频道+事件，最多 2s；返回命中的消息
async fn wait_for(
    rx: &mut broadcast::Receiver<GatewayMessage>,
    channel: &str,
    event: &str,
) -> GatewayMessage {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let msg = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {channel}/{event}"))
            .expect("bus closed");
        if msg.channel == channel && msg.event == event {
            return msg;
        }
    }
}

#[tokio::test]
async fn reservation_create_broadcasts_reservation_and_table_snapshots() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let mut rx = app.state.gateway.subscribe();
    app.state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    let msg = wait_for(&mut rx, "reservations", "reservations-updated").await;
    assert_eq!(msg.payload.as_array().map(Vec::len), Some(1));

    let msg = wait_for(&mut rx, "tables", "tables-updated").await;
    let tables = msg.payload.as_array().expect("array payload");
    assert_eq!(tables[0]["status"], "RESERVED");
}

#[tokio::test]
async fn cancelling_announces_the_freed_table() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    let mut rx = app.state.gateway.subscribe();
    app.state
        .reservations
        .cancel(&view.id, &user.id)
        .await
        .expect("cancel");

    let msg = wait_for(&mut rx, "tables", "table-available").await;
    assert_eq!(msg.payload["tableId"], table.id.as_str());
}

#[tokio::test]
async fn queue_join_notifies_the_user_of_their_position() {
    let app = spawn().await;
    let alice = seed_user(&app.state, "alice").await;
    let bob = seed_user(&app.state, "bob").await;
    app.state.queue.join(&alice.id).await.expect("join alice");

    let mut rx = app.state.gateway.subscribe();
    app.state.queue.join(&bob.id).await.expect("join bob");

    let msg = wait_for(&mut rx, "queue", "queue-updated").await;
    assert_eq!(msg.payload.as_array().map(Vec::len), Some(2));

    let channel = format!("user-{}", bob.id);
    let msg = wait_for(&mut rx, &channel, "queue-position").await;
    assert_eq!(msg.payload["position"], 2);
    assert_eq!(msg.payload["totalInQueue"], 2);
}

#[tokio::test]
async fn serving_the_queue_notifies_the_served_user() {
    let app = spawn().await;
    let alice = seed_user(&app.state, "alice").await;
    app.state.queue.join(&alice.id).await.expect("join");

    let mut rx = app.state.gateway.subscribe();
    app.state
        .queue
        .serve_next()
        .await
        .expect("serve")
        .expect("queue not empty");

    let channel = format!("user-{}", alice.id);
    wait_for(&mut rx, &channel, "table-available").await;
}

#[tokio::test]
async fn order_lifecycle_keeps_the_order_channel_current() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;
    app.state
        .tables
        .set_status(&table.id, TableStatus::Occupied)
        .await
        .expect("occupy");

    let mut rx = app.state.gateway.subscribe();
    let order = app
        .state
        .orders
        .create(&table.id, vec![item("Pasta", "12.50", 1)], &user.id)
        .await
        .expect("order");

    let msg = wait_for(&mut rx, "orders", "orders-updated").await;
    assert_eq!(msg.payload.as_array().map(Vec::len), Some(1));

    app.state.orders.complete(&order.id).await.expect("complete");

    // 送达后订单离开活跃集合
    let msg = wait_for(&mut rx, "orders", "orders-updated").await;
    assert_eq!(msg.payload.as_array().map(Vec::len), Some(0));
}
