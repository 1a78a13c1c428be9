use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::database::models::User;
use crate::error::ApiError;
use crate::identity::SessionUser;
use crate::operations::users;

/// GET /api/users - List all users
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(users::list(state.store.as_ref()).await?))
}

/// GET /api/users/me - The identity subsystem's session user, or null.
/// Never an error status: lookup failures are logged server-side.
pub async fn me(State(state): State<AppState>) -> Json<Option<SessionUser>> {
    Json(users::logged_user(state.identity.as_ref()).await)
}

/// GET /api/users/:id - Get a user by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(users::get(state.store.as_ref(), &id).await?))
}

/// POST /api/users - Create a user
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let row = users::create(state.store.as_ref(), state.identity.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/users/:id - Partially update a user; email/name changes are
/// mirrored into the identity record.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(users::update(state.store.as_ref(), state.identity.as_ref(), &id, &payload).await?))
}

/// DELETE /api/users/:id - Delete a user. 204 with no body.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    users::remove(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// PUT /api/users/:id/password - Route a password change to the identity
/// subsystem. The users table is never touched.
pub async fn update_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    users::update_password(state.identity.as_ref(), &id, &payload.password).await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// GET /api/frames/:frame_id/collaborators - Users collaborating on a frame
pub async fn collaborators(
    State(state): State<AppState>,
    Path(frame_id): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(users::collaborators(state.store.as_ref(), &frame_id).await?))
}

/// GET /api/frames/:frame_id/non_collaborators - Users not yet collaborating
pub async fn non_collaborators(
    State(state): State<AppState>,
    Path(frame_id): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(users::non_collaborators(state.store.as_ref(), &frame_id).await?))
}
