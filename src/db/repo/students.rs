//! Student operations for the repository.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{
    decode_timestamp, ensure_email_available, fetch_by_id, Repository, StoredRecord,
    WriteTransaction,
};
use crate::db::error::{on_unique_violation, StoreError};
use crate::domain::primitives::{format_date, format_timestamp, now_timestamp, DATE_FORMAT};
use crate::domain::{Entity, Student, StudentInput};

impl StoredRecord for Student {
    const SELECT: &'static str =
        "SELECT s.id, s.name, s.email, s.phone, s.grade, s.date_of_birth, s.created_at FROM student s";
    const KEY: &'static str = "s.id";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let date_of_birth: String = row.try_get("date_of_birth")?;
        let date_of_birth = NaiveDate::parse_from_str(&date_of_birth, DATE_FORMAT).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "date_of_birth".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Student {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            grade: row.try_get("grade")?,
            date_of_birth,
            created_at: decode_timestamp(row, "created_at")?,
        })
    }
}

impl Repository {
    /// Insert a new student.
    ///
    /// # Errors
    /// `Validation` for missing/malformed fields, `Conflict` if the email is taken.
    pub async fn create_student(&self, input: &StudentInput) -> Result<Student, StoreError> {
        let new = input.validate()?;
        let created_at = now_timestamp();
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        ensure_email_available(&mut tx, Student::TABLE, &new.email, None).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO student (name, email, phone, grade, date_of_birth, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.grade)
        .bind(format_date(&new.date_of_birth))
        .bind(format_timestamp(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, Student::TABLE, &new.email))?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(id, "Created student");
        Ok(Student {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            grade: new.grade,
            date_of_birth: new.date_of_birth,
            created_at,
        })
    }

    /// Replace every mutable field of a student; `created_at` is kept.
    ///
    /// # Errors
    /// `NotFound` if the id is unknown, otherwise as [`Repository::create_student`].
    pub async fn update_student(
        &self,
        id: i64,
        input: &StudentInput,
    ) -> Result<Student, StoreError> {
        let new = input.validate()?;
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let current = fetch_by_id::<Student>(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found(Student::TABLE, id))?;
        ensure_email_available(&mut tx, Student::TABLE, &new.email, Some(id)).await?;

        sqlx::query(
            r#"
            UPDATE student
            SET name = ?, email = ?, phone = ?, grade = ?, date_of_birth = ?
            WHERE id = ?
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.grade)
        .bind(format_date(&new.date_of_birth))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, Student::TABLE, &new.email))?;

        tx.commit().await?;

        info!(id, "Updated student");
        Ok(Student {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            grade: new.grade,
            date_of_birth: new.date_of_birth,
            created_at: current.created_at,
        })
    }
}
