//! Handlers shared by every record type.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::AppState;
use crate::db::StoredRecord;
use crate::domain::Representation;
use crate::error::AppError;

pub async fn list<E: StoredRecord>(
    State(state): State<AppState>,
) -> Result<Json<Vec<Representation>>, AppError> {
    let records = state.repo.list_all::<E>().await?;
    Ok(Json(records.iter().map(E::to_representation).collect()))
}

pub async fn get<E: StoredRecord>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Representation>, AppError> {
    let Path(id) = id?;
    let record = state.repo.get::<E>(id).await?;
    Ok(Json(record.to_representation()))
}

pub async fn delete<E: StoredRecord>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.repo.delete::<E>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
