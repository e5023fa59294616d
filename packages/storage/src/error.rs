// ABOUTME: Error types for the epic record store
// ABOUTME: Separates schema validation failures from database failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Epic validation failed: {0}")]
    Validation(String),

    #[error("Epic not found")]
    NotFound,

    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt epic record: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
