//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Operations shared by every record type (list, get, delete) are generic over
//! [`StoredRecord`]; create and update live in per-record submodules:
//! - `students.rs` - Student rows and email uniqueness
//! - `teachers.rs` - Teacher rows and email uniqueness
//! - `courses.rs` - Course rows and the teacher reference
//!
//! Every write runs in a [`WriteTransaction`], which holds SQLite's write lock
//! from `BEGIN` so concurrent writers wait on `busy_timeout` instead of failing.

mod courses;
mod students;
mod teachers;
mod write_tx;

use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

use crate::db::error::StoreError;
use crate::domain::primitives::parse_timestamp;
use crate::domain::Entity;
use write_tx::WriteTransaction;

/// A table whose rows reference another record's id.
#[derive(Debug, Clone, Copy)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
}

/// Row mapping for a record type.
pub trait StoredRecord: Entity + Sized + Send + Unpin {
    /// Select list without filtering or ordering.
    const SELECT: &'static str;
    /// Qualified id column of `SELECT`.
    const KEY: &'static str;
    /// Rows that block deletion while they reference a record.
    const DEPENDENTS: &'static [Dependent] = &[];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Repository for database operations.
///
/// Owns the connection pool; every operation acquires its own connection or
/// transaction and releases it before returning.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Every record of type `E`, in id order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_all<E: StoredRecord>(&self) -> Result<Vec<E>, StoreError> {
        let sql = format!("{} ORDER BY {} ASC", E::SELECT, E::KEY);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let records = rows
            .iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// A single record by id.
    ///
    /// # Errors
    /// Returns `NotFound` if no record has this id.
    pub async fn get<E: StoredRecord>(&self, id: i64) -> Result<E, StoreError> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id::<E>(&mut conn, id)
            .await?
            .ok_or_else(|| StoreError::not_found(E::TABLE, id))
    }

    /// Delete a record by id.
    ///
    /// Deletion is refused with `Conflict` while any [`StoredRecord::DEPENDENTS`]
    /// row still references the record.
    ///
    /// # Errors
    /// Returns `NotFound` if no record has this id.
    pub async fn delete<E: StoredRecord>(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        if !exists(&mut tx, E::TABLE, id).await? {
            return Err(StoreError::not_found(E::TABLE, id));
        }

        for dependent in E::DEPENDENTS {
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                dependent.table, dependent.column
            );
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            if count > 0 {
                return Err(StoreError::Conflict(format!(
                    "{} {} is still referenced by {} {} record(s)",
                    E::TABLE,
                    id,
                    count,
                    dependent.table
                )));
            }
        }

        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
        sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    StoreError::Conflict(format!("{} {} is still referenced", E::TABLE, id))
                }
                _ => StoreError::Database(err),
            })?;

        tx.commit().await?;
        info!(table = E::TABLE, id, "Deleted record");
        Ok(())
    }
}

async fn fetch_by_id<E: StoredRecord>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<E>, sqlx::Error> {
    let sql = format!("{} WHERE {} = ?", E::SELECT, E::KEY);
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
    row.as_ref().map(E::from_row).transpose()
}

async fn exists(conn: &mut SqliteConnection, table: &str, id: i64) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// Fail with `Conflict` if another row of `table` already uses `email`.
async fn ensure_email_available(
    conn: &mut SqliteConnection,
    table: &str,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<(), StoreError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE email = ? AND id IS NOT ?",
        table
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await?;

    if count > 0 {
        return Err(StoreError::Conflict(format!(
            "{} with email {} already exists",
            table, email
        )));
    }
    Ok(())
}

fn decode_timestamp(row: &SqliteRow, column: &str) -> Result<NaiveDateTime, sqlx::Error> {
    let text: String = row.try_get(column)?;
    parse_timestamp(&text).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
