//! User Repository

use sqlx::Sqlite;

use super::RepoResult;
use crate::db::models::{User, UserSummary};

pub async fn insert<'e, E>(db: E, user: &User) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(db: E, id: &str) -> RepoResult<Option<User>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn summary<'e, E>(db: E, id: &str) -> RepoResult<Option<UserSummary>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_all<'e, E>(db: E) -> RepoResult<Vec<UserSummary>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email FROM users ORDER BY created_at",
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}
