//! 预订生命周期集成测试
//!
//! 覆盖：创建/冲突/取消/履约/过期扫描，以及桌台状态联动。

mod common;

use comanda_server::AppError;
use comanda_server::db::models::{ReservationStatus, TableStatus};
use common::{seed_table, seed_user, spawn};

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
async fn create_reserves_a_free_table_for_exactly_fifteen_minutes() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation should succeed");

    assert_eq!(view.status, ReservationStatus::Active);
    assert_eq!(view.table.status, TableStatus::Reserved);
    assert_eq!(view.expires_at, view.created_at + 15 * 60 * 1000);
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Reserved);
}

#[tokio::test]
async fn second_reservation_on_the_same_table_conflicts() {
    let app = spawn().await;
    let alice = seed_user(&app.state, "alice").await;
    let bob = seed_user(&app.state, "bob").await;
    let table = seed_table(&app.state, 1, 4).await;

    app.state
        .reservations
        .create(&table.id, &alice.id)
        .await
        .expect("first reservation");

    let err = app
        .state
        .reservations
        .create(&table.id, &bob.id)
        .await
        .expect_err("second reservation must be rejected");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn create_rejects_unknown_user_and_unknown_table() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let err = app
        .state
        .reservations
        .create(&table.id, "missing-user")
        .await
        .expect_err("unknown user");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = app
        .state
        .reservations
        .create("missing-table", &user.id)
        .await
        .expect_err("unknown table");
    assert!(matches!(err, AppError::Invalid(_)), "got {err:?}");
}

#[tokio::test]
async fn cancel_frees_the_table_and_is_owner_only() {
    let app = spawn().await;
    let alice = seed_user(&app.state, "alice").await;
    let bob = seed_user(&app.state, "bob").await;
    let table = seed_table(&app.state, 1, 4).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &alice.id)
        .await
        .expect("reservation");

    // 他人不能取消
    let err = app
        .state
        .reservations
        .cancel(&view.id, &bob.id)
        .await
        .expect_err("non-owner cancel must fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Reserved);

    let cancelled = app
        .state
        .reservations
        .cancel(&view.id, &alice.id)
        .await
        .expect("owner cancel");
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Free);

    // 取消后桌台可以再次被预订
    app.state
        .reservations
        .create(&table.id, &bob.id)
        .await
        .expect("table is reservable again");
}

#[tokio::test]
async fn complete_marks_fulfilled_and_frees_the_table() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 2).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    let completed = app
        .state
        .reservations
        .complete(&view.id)
        .await
        .expect("complete");
    assert_eq!(completed.status, ReservationStatus::Completed);
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Free);
}

#[tokio::test]
async fn expiry_sweep_honors_the_exact_deadline_and_is_idempotent() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    // 截止时刻之前：不动
    let expired = app
        .state
        .reservations
        .expire_at(view.expires_at - 1)
        .await
        .expect("sweep before deadline");
    assert_eq!(expired, 0);
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Reserved);

    // 截止时刻：过期并释放桌台
    let expired = app
        .state
        .reservations
        .expire_at(view.expires_at)
        .await
        .expect("sweep at deadline");
    assert_eq!(expired, 1);
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Free);

    let reservation = app.state.reservations.get(&view.id).await.expect("get");
    assert_eq!(reservation.status, ReservationStatus::Expired);

    // 再扫一遍什么都不会发生
    let expired = app
        .state
        .reservations
        .expire_at(view.expires_at + 60_000)
        .await
        .expect("second sweep");
    assert_eq!(expired, 0);
}

#[tokio::test]
async fn racing_creates_on_one_table_admit_exactly_one() {
    let app = spawn().await;
    let table = seed_table(&app.state, 1, 4).await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(seed_user(&app.state, &format!("guest{i}")).await);
    }

    let mut handles = Vec::new();
    for user in &users {
        let reservations = app.state.reservations.clone();
        let table_id = table.id.clone();
        let user_id = user.id.clone();
        handles.push(tokio::spawn(async move {
            reservations.create(&table_id, &user_id).await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        if handle.await.expect("task").is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 1, "exactly one racing reservation may win");
    assert_eq!(table_status(&app, &table.id).await, TableStatus::Reserved);
}
