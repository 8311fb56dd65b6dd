//! Course record and its link to the owning teacher.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::primitives::{format_timestamp, require_text, Representation, ValidationError};
use crate::domain::Entity;

/// A stored course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub credits: i64,
    pub created_at: NaiveDateTime,
    /// Name of the teacher behind `teacher_id` when the row was read.
    pub teacher_name: Option<String>,
}

/// Full field set supplied on create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub teacher_id: i64,
    pub credits: i64,
}

/// A `CourseInput` that passed validation. The teacher reference is checked
/// by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub credits: i64,
}

impl CourseInput {
    pub fn validate(&self) -> Result<NewCourse, ValidationError> {
        require_text("name", &self.name)?;

        Ok(NewCourse {
            name: self.name.clone(),
            description: self.description.clone(),
            teacher_id: self.teacher_id,
            credits: self.credits,
        })
    }
}

impl Entity for Course {
    const TABLE: &'static str = "course";

    fn to_representation(&self) -> Representation {
        let mut map = Representation::new();
        map.insert("id".into(), self.id.into());
        map.insert("name".into(), self.name.clone().into());
        map.insert(
            "description".into(),
            self.description.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map.insert("teacher_id".into(), self.teacher_id.into());
        map.insert(
            "teacher_name".into(),
            self.teacher_name.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map.insert("credits".into(), self.credits.into());
        map.insert("created_at".into(), format_timestamp(&self.created_at).into());
        map
    }
}
