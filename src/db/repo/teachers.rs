//! Teacher operations for the repository.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{
    decode_timestamp, ensure_email_available, fetch_by_id, Dependent, Repository, StoredRecord,
    WriteTransaction,
};
use crate::db::error::{on_unique_violation, StoreError};
use crate::domain::primitives::{format_timestamp, now_timestamp};
use crate::domain::{Course, Entity, Teacher, TeacherInput};

impl StoredRecord for Teacher {
    const SELECT: &'static str =
        "SELECT t.id, t.name, t.email, t.phone, t.subject, t.experience, t.created_at FROM teacher t";
    const KEY: &'static str = "t.id";
    const DEPENDENTS: &'static [Dependent] = &[Dependent {
        table: Course::TABLE,
        column: "teacher_id",
    }];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Teacher {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            experience: row.try_get("experience")?,
            created_at: decode_timestamp(row, "created_at")?,
        })
    }
}

impl Repository {
    /// Insert a new teacher.
    ///
    /// # Errors
    /// `Validation` for missing/blank fields, `Conflict` if the email is taken.
    pub async fn create_teacher(&self, input: &TeacherInput) -> Result<Teacher, StoreError> {
        let new = input.validate()?;
        let created_at = now_timestamp();
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        ensure_email_available(&mut tx, Teacher::TABLE, &new.email, None).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO teacher (name, email, phone, subject, experience, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.subject)
        .bind(new.experience)
        .bind(format_timestamp(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, Teacher::TABLE, &new.email))?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(id, "Created teacher");
        Ok(Teacher {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            subject: new.subject,
            experience: new.experience,
            created_at,
        })
    }

    /// Replace every mutable field of a teacher; `created_at` is kept.
    ///
    /// # Errors
    /// `NotFound` if the id is unknown, otherwise as [`Repository::create_teacher`].
    pub async fn update_teacher(
        &self,
        id: i64,
        input: &TeacherInput,
    ) -> Result<Teacher, StoreError> {
        let new = input.validate()?;
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let current = fetch_by_id::<Teacher>(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found(Teacher::TABLE, id))?;
        ensure_email_available(&mut tx, Teacher::TABLE, &new.email, Some(id)).await?;

        sqlx::query(
            r#"
            UPDATE teacher
            SET name = ?, email = ?, phone = ?, subject = ?, experience = ?
            WHERE id = ?
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.subject)
        .bind(new.experience)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, Teacher::TABLE, &new.email))?;

        tx.commit().await?;

        info!(id, "Updated teacher");
        Ok(Teacher {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            subject: new.subject,
            experience: new.experience,
            created_at: current.created_at,
        })
    }
}
