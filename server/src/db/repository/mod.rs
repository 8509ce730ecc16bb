//! Repository Module
//!
//! Thin SQL access layer over the SQLite pool. Functions take any
//! `sqlx` executor so the services can run them either directly against
//! the pool or inside a transaction.

pub mod orders;
pub mod queue;
pub mod reservations;
pub mod tables;
pub mod users;

use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            _ => {
                if let Some(db_err) = err.as_database_error()
                    && db_err.is_unique_violation()
                {
                    return RepoError::Duplicate(db_err.message().to_string());
                }
                RepoError::Database(err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("Corrupt JSON column: {err}"))
    }
}

/// Constraint violations become the same Conflict the manager pre-checks
/// raise, so racing writers observe one consistent error taxonomy.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
