use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::AppState;
use crate::domain::{CourseInput, Entity, Representation};
use crate::error::AppError;

/// Create a course; an unknown `teacher_id` is answered with 422.
pub async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Representation>), AppError> {
    let Json(input) = payload?;
    let course = state.repo.create_course(&input).await?;
    Ok((StatusCode::CREATED, Json(course.to_representation())))
}

pub async fn update_course(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<Json<Representation>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let course = state.repo.update_course(id, &input).await?;
    Ok(Json(course.to_representation()))
}
