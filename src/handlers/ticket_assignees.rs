use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::AppState;
use crate::database::models::TicketAssignee;
use crate::error::ApiError;
use crate::operations::ticket_assignees;

/// GET /api/ticket_assignees - List all assignment rows
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TicketAssignee>>, ApiError> {
    Ok(Json(ticket_assignees::list(state.store.as_ref()).await?))
}

/// GET /api/ticket_assignees/:id - Get an assignment row by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TicketAssignee>, ApiError> {
    Ok(Json(ticket_assignees::get(state.store.as_ref(), &id).await?))
}

/// POST /api/ticket_assignees - Create an assignment row
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<TicketAssignee>), ApiError> {
    let row = ticket_assignees::create(state.store.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/ticket_assignees/:id - Partially update an assignment row
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<TicketAssignee>, ApiError> {
    Ok(Json(ticket_assignees::update(state.store.as_ref(), &id, &payload).await?))
}

/// DELETE /api/ticket_assignees/:id - Delete an assignment row. 204, no body.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ticket_assignees::remove(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
