//! Student record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::primitives::{
    format_date, format_timestamp, parse_date, require_text, Representation, ValidationError,
};
use crate::domain::Entity;

/// A stored student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// Unique across all students.
    pub email: String,
    pub phone: String,
    pub grade: String,
    pub date_of_birth: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Full field set supplied on create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade: String,
    /// Strict `YYYY-MM-DD`.
    pub date_of_birth: String,
}

/// A `StudentInput` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade: String,
    pub date_of_birth: NaiveDate,
}

impl StudentInput {
    pub fn validate(&self) -> Result<NewStudent, ValidationError> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        require_text("phone", &self.phone)?;
        require_text("grade", &self.grade)?;
        let date_of_birth = parse_date("date_of_birth", &self.date_of_birth)?;

        Ok(NewStudent {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            grade: self.grade.clone(),
            date_of_birth,
        })
    }
}

impl Entity for Student {
    const TABLE: &'static str = "student";

    fn to_representation(&self) -> Representation {
        let mut map = Representation::new();
        map.insert("id".into(), self.id.into());
        map.insert("name".into(), self.name.clone().into());
        map.insert("email".into(), self.email.clone().into());
        map.insert("phone".into(), self.phone.clone().into());
        map.insert("grade".into(), self.grade.clone().into());
        map.insert("date_of_birth".into(), format_date(&self.date_of_birth).into());
        map.insert("created_at".into(), format_timestamp(&self.created_at).into());
        map
    }
}
