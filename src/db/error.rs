//! Failure taxonomy of the persistence layer.

use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A unique constraint would be violated, or a delete is blocked by dependents.
    #[error("{0}")]
    Conflict(String),
    /// A course names a teacher that does not exist.
    #[error("teacher {teacher_id} does not exist")]
    Reference { teacher_id: i64 },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

/// Translate a unique-constraint failure reported by SQLite into a conflict.
pub(crate) fn on_unique_violation(err: sqlx::Error, entity: &str, email: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{} with email {} already exists", entity, email))
        }
        _ => StoreError::Database(err),
    }
}

/// Translate a foreign-key failure reported by SQLite into a dangling reference.
pub(crate) fn on_foreign_key_violation(err: sqlx::Error, teacher_id: i64) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::Reference { teacher_id }
        }
        _ => StoreError::Database(err),
    }
}
