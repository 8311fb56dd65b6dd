//! Course operations for the repository.

use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use tracing::info;

use super::{decode_timestamp, fetch_by_id, Repository, StoredRecord, WriteTransaction};
use crate::db::error::{on_foreign_key_violation, StoreError};
use crate::domain::primitives::{format_timestamp, now_timestamp};
use crate::domain::{Course, CourseInput, Entity};

impl StoredRecord for Course {
    // LEFT JOIN keeps courses listed even if their teacher row is gone.
    const SELECT: &'static str = r#"
        SELECT c.id, c.name, c.description, c.teacher_id, c.credits, c.created_at,
               t.name AS teacher_name
        FROM course c
        LEFT JOIN teacher t ON t.id = c.teacher_id
    "#;
    const KEY: &'static str = "c.id";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Course {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            teacher_id: row.try_get("teacher_id")?,
            credits: row.try_get("credits")?,
            created_at: decode_timestamp(row, "created_at")?,
            teacher_name: row.try_get("teacher_name")?,
        })
    }
}

/// Name of the referenced teacher, or `Reference` if there is none.
async fn resolve_teacher(conn: &mut SqliteConnection, teacher_id: i64) -> Result<String, StoreError> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM teacher WHERE id = ?")
        .bind(teacher_id)
        .fetch_optional(&mut *conn)
        .await?;
    name.ok_or(StoreError::Reference { teacher_id })
}

impl Repository {
    /// Insert a new course owned by an existing teacher.
    ///
    /// # Errors
    /// `Validation` for a blank name, `Reference` if `teacher_id` is unknown.
    pub async fn create_course(&self, input: &CourseInput) -> Result<Course, StoreError> {
        let new = input.validate()?;
        let created_at = now_timestamp();
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let teacher_name = resolve_teacher(&mut tx, new.teacher_id).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO course (name, description, teacher_id, credits, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.teacher_id)
        .bind(new.credits)
        .bind(format_timestamp(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| on_foreign_key_violation(e, new.teacher_id))?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(id, teacher_id = new.teacher_id, "Created course");
        Ok(Course {
            id,
            name: new.name,
            description: new.description,
            teacher_id: new.teacher_id,
            credits: new.credits,
            created_at,
            teacher_name: Some(teacher_name),
        })
    }

    /// Replace every mutable field of a course; `created_at` is kept.
    ///
    /// # Errors
    /// `NotFound` if the id is unknown, otherwise as [`Repository::create_course`].
    pub async fn update_course(&self, id: i64, input: &CourseInput) -> Result<Course, StoreError> {
        let new = input.validate()?;
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let current = fetch_by_id::<Course>(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found(Course::TABLE, id))?;
        let teacher_name = resolve_teacher(&mut tx, new.teacher_id).await?;

        sqlx::query(
            r#"
            UPDATE course
            SET name = ?, description = ?, teacher_id = ?, credits = ?
            WHERE id = ?
            "#,
        )
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.teacher_id)
        .bind(new.credits)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| on_foreign_key_violation(e, new.teacher_id))?;

        tx.commit().await?;

        info!(id, teacher_id = new.teacher_id, "Updated course");
        Ok(Course {
            id,
            name: new.name,
            description: new.description,
            teacher_id: new.teacher_id,
            credits: new.credits,
            created_at: current.created_at,
            teacher_name: Some(teacher_name),
        })
    }
}
