//! 桌台注册表集成测试

mod common;

use comanda_server::AppError;
use comanda_server::db::models::{DiningTableCreate, DiningTableUpdate, TableStatus};
use common::{seed_table, seed_user, spawn};

#[tokio::test]
async fn table_numbers_are_unique() {
    let app = spawn().await;
    seed_table(&app.state, 7, 4).await;

    let err = app
        .state
        .tables
        .create(DiningTableCreate {
            number: 7,
            capacity: 2,
        })
        .await
        .expect_err("duplicate number");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn capacity_must_be_positive() {
    let app = spawn().await;

    let err = app
        .state
        .tables
        .create(DiningTableCreate {
            number: 1,
            capacity: 0,
        })
        .await
        .expect_err("zero capacity");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn available_lists_only_free_tables() {
    let app = spawn().await;
    let t1 = seed_table(&app.state, 1, 4).await;
    let t2 = seed_table(&app.state, 2, 4).await;

    app.state
        .tables
        .set_status(&t1.id, TableStatus::Occupied)
        .await
        .expect("occupy");

    let available = app.state.tables.list_available().await.expect("available");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, t2.id);
}

#[tokio::test]
async fn update_patches_number_and_capacity() {
    let app = spawn().await;
    let table = seed_table(&app.state, 1, 4).await;

    let updated = app
        .state
        .tables
        .update(
            &table.id,
            DiningTableUpdate {
                number: None,
                capacity: Some(6),
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.number, 1);
    assert_eq!(updated.capacity, 6);
}

#[tokio::test]
async fn overview_embeds_the_active_reservation() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    app.state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    let overview = app.state.tables.get(&table.id).await.expect("overview");
    assert_eq!(overview.table.status, TableStatus::Reserved);
    let reservation = overview.reservation.expect("embedded reservation");
    assert_eq!(reservation.user.id, user.id);
    assert!(overview.order.is_none());

    let all = app.state.tables.list_all().await.expect("list");
    assert_eq!(all.len(), 1);
    assert!(all[0].reservation.is_some());
}

#[tokio::test]
async fn delete_is_refused_while_a_reservation_is_active() {
    let app = spawn().await;
    let user = seed_user(&app.state, "alice").await;
    let table = seed_table(&app.state, 1, 4).await;

    let view = app
        .state
        .reservations
        .create(&table.id, &user.id)
        .await
        .expect("reservation");

    let err = app
        .state
        .tables
        .delete(&table.id)
        .await
        .expect_err("delete guarded");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    app.state
        .reservations
        .cancel(&view.id, &user.id)
        .await
        .expect("cancel");
    assert!(app.state.tables.delete(&table.id).await.expect("delete"));
}
