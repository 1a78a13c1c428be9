use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::AppState;
use crate::database::models::{Ticket, TicketAssignee};
use crate::error::ApiError;
use crate::operations::tickets;

/// GET /api/tickets - List all tickets with their assignees
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Ticket>>, ApiError> {
    Ok(Json(tickets::list(state.store.as_ref()).await?))
}

/// GET /api/tickets/:id - Get a ticket (with assignees) by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    Ok(Json(tickets::get(state.store.as_ref(), &id).await?))
}

/// POST /api/tickets - Create a ticket
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let row = tickets::create(state.store.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/tickets/:id - Partially update a ticket
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Ticket>, ApiError> {
    Ok(Json(tickets::update(state.store.as_ref(), &id, &payload).await?))
}

/// DELETE /api/tickets/:id - Delete a ticket. 204 with no body.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tickets::remove(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/tickets/:id/assignees - Assign a user to a ticket
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> Result<(StatusCode, Json<TicketAssignee>), ApiError> {
    let row = tickets::assign(state.store.as_ref(), &id, &payload.user_id).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
