//! 排队位置不变量集成测试
//!
//! 位置必须始终是稠密的 1..N：中途离开要补位，并发加入不能出现
//! 重复或空洞。

mod common;

use comanda_server::AppError;
use comanda_server::db::models::User;
use common::{seed_user, spawn};
use rand::Rng;
use std::collections::HashSet;

/// 断言队列位置恰好是 1..=N 且与给定用户顺序一致
async fn assert_dense(app: &common::TestApp, expected_user_ids: &[&str]) {
    let entries = app.state.queue.list().await.expect("list queue");
    assert_eq!(entries.len(), expected_user_ids.len());
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.position, (i + 1) as i64, "positions must be dense");
        assert_eq!(entry.user.id, expected_user_ids[i], "FIFO order broken");
    }
}

#[tokio::test]
async fn joins_append_at_the_tail() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;
    let b = seed_user(&app.state, "b").await;
    let c = seed_user(&app.state, "c").await;

    assert_eq!(app.state.queue.join(&a.id).await.expect("join a").position, 1);
    assert_eq!(app.state.queue.join(&b.id).await.expect("join b").position, 2);
    assert_eq!(app.state.queue.join(&c.id).await.expect("join c").position, 3);

    assert_dense(&app, &[&a.id, &b.id, &c.id]).await;
}

#[tokio::test]
async fn a_user_joins_at_most_once() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;

    app.state.queue.join(&a.id).await.expect("join");
    let err = app.state.queue.join(&a.id).await.expect_err("double join");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn leaving_from_the_middle_closes_the_gap() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;
    let b = seed_user(&app.state, "b").await;
    let c = seed_user(&app.state, "c").await;

    for user in [&a, &b, &c] {
        app.state.queue.join(&user.id).await.expect("join");
    }

    app.state.queue.leave(&b.id).await.expect("b leaves");
    assert_dense(&app, &[&a.id, &c.id]).await;

    // 新加入者排到队尾
    let d = seed_user(&app.state, "d").await;
    assert_eq!(app.state.queue.join(&d.id).await.expect("join d").position, 3);
    assert_dense(&app, &[&a.id, &c.id, &d.id]).await;
}

#[tokio::test]
async fn leave_requires_membership() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;

    let err = app.state.queue.leave(&a.id).await.expect_err("not queued");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn my_position_is_recomputed_from_rank() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;
    let b = seed_user(&app.state, "b").await;
    let c = seed_user(&app.state, "c").await;

    for user in [&a, &b, &c] {
        app.state.queue.join(&user.id).await.expect("join");
    }

    let position = app.state.queue.position(&c.id).await.expect("position");
    assert_eq!(position.position, 3);
    assert_eq!(position.total_in_queue, 3);

    app.state.queue.leave(&a.id).await.expect("a leaves");
    let position = app.state.queue.position(&c.id).await.expect("position");
    assert_eq!(position.position, 2);
    assert_eq!(position.total_in_queue, 2);
}

#[tokio::test]
async fn serve_next_pops_the_front_in_fifo_order() {
    let app = spawn().await;
    let a = seed_user(&app.state, "a").await;
    let b = seed_user(&app.state, "b").await;

    app.state.queue.join(&a.id).await.expect("join a");
    app.state.queue.join(&b.id).await.expect("join b");

    let peeked = app
        .state
        .queue
        .peek_next()
        .await
        .expect("peek")
        .expect("queue not empty");
    assert_eq!(peeked.user.id, a.id);

    let served = app
        .state
        .queue
        .serve_next()
        .await
        .expect("serve")
        .expect("queue not empty");
    assert_eq!(served.user.id, a.id);
    assert_dense(&app, &[&b.id]).await;

    let served = app
        .state
        .queue
        .serve_next()
        .await
        .expect("serve")
        .expect("queue not empty");
    assert_eq!(served.user.id, b.id);

    assert!(app.state.queue.serve_next().await.expect("serve").is_none());
}

#[tokio::test]
async fn concurrent_joins_assign_unique_dense_positions() {
    let app = spawn().await;

    let mut users = Vec::new();
    for i in 0..10 {
        users.push(seed_user(&app.state, &format!("guest{i}")).await);
    }

    let mut handles = Vec::new();
    for user in &users {
        let queue = app.state.queue.clone();
        let user_id = user.id.clone();
        handles.push(tokio::spawn(async move { queue.join(&user_id).await }));
    }

    let mut positions = HashSet::new();
    for handle in handles {
        let entry = handle.await.expect("task").expect("join");
        assert!(positions.insert(entry.position), "duplicate position");
    }

    let entries = app.state.queue.list().await.expect("list");
    assert_eq!(entries.len(), users.len());
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.position, (i + 1) as i64);
    }
}

#[tokio::test]
async fn random_join_leave_sequences_keep_positions_dense() {
    let app = spawn().await;
    let mut rng = rand::thread_rng();

    let mut users: Vec<User> = Vec::new();
    for i in 0..12 {
        users.push(seed_user(&app.state, &format!("guest{i}")).await);
    }

    let mut queued: Vec<String> = Vec::new();
    let mut outside: Vec<String> = users.iter().map(|u| u.id.clone()).collect();

    for _ in 0..60 {
        let join = !outside.is_empty() && (queued.is_empty() || rng.gen_bool(0.5));
        if join {
            let idx = rng.gen_range(0..outside.len());
            let id = outside.swap_remove(idx);
            app.state.queue.join(&id).await.expect("join");
            queued.push(id);
        } else if !queued.is_empty() {
            let idx = rng.gen_range(0..queued.len());
            let id = queued.remove(idx);
            app.state.queue.leave(&id).await.expect("leave");
            outside.push(id);
        }

        // 每一步之后队列都保持 FIFO 且位置稠密
        let expected: Vec<&str> = queued.iter().map(String::as_str).collect();
        assert_dense(&app, &expected).await;
    }
}
