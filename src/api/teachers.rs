use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::AppState;
use crate::domain::{Entity, Representation, TeacherInput};
use crate::error::AppError;

pub async fn create_teacher(
    State(state): State<AppState>,
    payload: Result<Json<TeacherInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Representation>), AppError> {
    let Json(input) = payload?;
    let teacher = state.repo.create_teacher(&input).await?;
    Ok((StatusCode::CREATED, Json(teacher.to_representation())))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TeacherInput>, JsonRejection>,
) -> Result<Json<Representation>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let teacher = state.repo.update_teacher(id, &input).await?;
    Ok(Json(teacher.to_representation()))
}
