//! Record types for the school registry.
//!
//! This module provides:
//! - Student, Teacher and Course records
//! - Typed inputs with boundary validation (`*Input::validate`)
//! - Primitive-valued representations for transport

pub mod course;
pub mod primitives;
pub mod student;
pub mod teacher;

pub use course::{Course, CourseInput, NewCourse};
pub use primitives::{Representation, ValidationError};
pub use student::{NewStudent, Student, StudentInput};
pub use teacher::{NewTeacher, Teacher, TeacherInput};

/// A record stored in its own table with a surrogate integer id.
pub trait Entity {
    /// Table holding records of this type; also used as the record's name in messages.
    const TABLE: &'static str;

    /// Project the record's fields to primitive values.
    fn to_representation(&self) -> Representation;
}
