use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::AppState;
use crate::domain::{Entity, Representation, StudentInput};
use crate::error::AppError;

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Representation>), AppError> {
    let Json(input) = payload?;
    let student = state.repo.create_student(&input).await?;
    Ok((StatusCode::CREATED, Json(student.to_representation())))
}

pub async fn update_student(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<Representation>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let student = state.repo.update_student(id, &input).await?;
    Ok(Json(student.to_representation()))
}
