pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod reports;

pub use config::Config;
pub use db::{init_db, Repository, StoreError};
pub use domain::{Course, CourseInput, Entity, Student, StudentInput, Teacher, TeacherInput};
pub use error::AppError;
