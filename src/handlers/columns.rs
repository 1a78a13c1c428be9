use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::AppState;
use crate::database::models::Column;
use crate::error::ApiError;
use crate::operations::columns;

/// GET /api/columns - List all columns
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Column>>, ApiError> {
    Ok(Json(columns::list(state.store.as_ref()).await?))
}

/// GET /api/columns/:id - Get a column by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Column>, ApiError> {
    Ok(Json(columns::get(state.store.as_ref(), &id).await?))
}

/// POST /api/columns - Create a column
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Column>), ApiError> {
    let row = columns::create(state.store.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/columns/:id - Partially update a column
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Column>, ApiError> {
    Ok(Json(columns::update(state.store.as_ref(), &id, &payload).await?))
}

/// DELETE /api/columns/:id - Delete a column. 204 with no body.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    columns::remove(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
