//! Teacher record.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::primitives::{format_timestamp, require_text, Representation, ValidationError};
use crate::domain::Entity;

/// A stored teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    /// Unique across all teachers.
    pub email: String,
    pub phone: String,
    pub subject: String,
    /// Years of experience.
    pub experience: i64,
    pub created_at: NaiveDateTime,
}

/// Full field set supplied on create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct TeacherInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub experience: i64,
}

/// A `TeacherInput` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub experience: i64,
}

impl TeacherInput {
    pub fn validate(&self) -> Result<NewTeacher, ValidationError> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        require_text("phone", &self.phone)?;
        require_text("subject", &self.subject)?;

        Ok(NewTeacher {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            subject: self.subject.clone(),
            experience: self.experience,
        })
    }
}

impl Entity for Teacher {
    const TABLE: &'static str = "teacher";

    fn to_representation(&self) -> Representation {
        let mut map = Representation::new();
        map.insert("id".into(), self.id.into());
        map.insert("name".into(), self.name.clone().into());
        map.insert("email".into(), self.email.clone().into());
        map.insert("phone".into(), self.phone.clone().into());
        map.insert("subject".into(), self.subject.clone().into());
        map.insert("experience".into(), self.experience.into());
        map.insert("created_at".into(), format_timestamp(&self.created_at).into());
        map
    }
}
