//! Repository Module
//!
//! Free-function CRUD per table, all taking `&SqlitePool`. Composite
//! operations that must be all-or-nothing (order+items, donation+stock
//! decrement, point debit+redemption) run in their own transactions here —
//! callers never see partial state.

pub mod categories;
pub mod donations;
pub mod loyalty;
pub mod menu_items;
pub mod ngo_partners;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod users;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
