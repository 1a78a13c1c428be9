use chrono::Utc;
use serde_json::Value;

use super::{decode, new_id, require_id};
use crate::database::models::{User, UserCreate, UserPatch};
use crate::database::Store;
use crate::error::ApiError;
use crate::identity::{CredentialsPatch, IdentityService, SessionUser};
use crate::schemas::users::{USER_CREATE, USER_UPDATE};
use crate::schemas::{FieldViolation, MIN_PASSWORD_LENGTH};

pub async fn list(store: &dyn Store) -> Result<Vec<User>, ApiError> {
    Ok(store.select_users().await?)
}

pub async fn get(store: &dyn Store, id: &str) -> Result<User, ApiError> {
    require_id(id, "id")?;
    Ok(store.select_user(id).await?)
}

/// The identity subsystem's session user. Failures are logged and surfaced
/// as no-session, never as an error response.
pub async fn logged_user(identity: &dyn IdentityService) -> Option<SessionUser> {
    match identity.current_session().await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!("failed to fetch current session: {}", err);
            None
        }
    }
}

/// Create a user profile row. A password, when supplied, goes to the
/// identity subsystem only; if that call fails the inserted row is removed
/// again so the two stores stay consistent.
pub async fn create(
    store: &dyn Store,
    identity: &dyn IdentityService,
    input: &Value,
) -> Result<User, ApiError> {
    let normalized = USER_CREATE.validate(input)?;
    let body: UserCreate = decode(normalized)?;

    let now = Utc::now();
    let row = User {
        id: new_id(),
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        created_at: now,
        updated_at: now,
    };
    let inserted = store.insert_user(row).await?;

    if let Some(password) = body.password {
        let creds = CredentialsPatch { password: Some(password), ..Default::default() };
        if let Err(err) = identity.update_credentials(creds).await {
            if let Err(rollback) = store.delete_user(&inserted.id).await {
                tracing::error!(
                    "failed to remove user {} after identity failure: {}",
                    inserted.id,
                    rollback
                );
            }
            return Err(err.into());
        }
    }

    Ok(inserted)
}

/// Update a user profile row and mirror email/name changes into the
/// identity subsystem's session record. The table update runs first so a
/// missing row 404s before any identity traffic; if the identity call then
/// fails, the table update is compensated by restoring the previous values.
pub async fn update(
    store: &dyn Store,
    identity: &dyn IdentityService,
    id: &str,
    input: &Value,
) -> Result<User, ApiError> {
    require_id(id, "id")?;
    let normalized = USER_UPDATE.validate(input)?;
    let patch: UserPatch = decode(normalized)?;

    let previous = store.select_user(id).await?;
    let updated = store.update_user(id, patch, Utc::now()).await?;

    let creds = CredentialsPatch {
        email: Some(updated.email.clone()),
        name: Some(format!("{} {}", updated.first_name, updated.last_name)),
        password: None,
    };
    if let Err(err) = identity.update_credentials(creds).await {
        let rollback = UserPatch {
            email: Some(previous.email),
            first_name: Some(previous.first_name),
            last_name: Some(previous.last_name),
        };
        if let Err(undo) = store.update_user(id, rollback, previous.updated_at).await {
            tracing::error!("failed to roll back user {} after identity failure: {}", id, undo);
        }
        return Err(err.into());
    }

    Ok(updated)
}

pub async fn remove(store: &dyn Store, id: &str) -> Result<(), ApiError> {
    require_id(id, "id")?;
    Ok(store.delete_user(id).await?)
}

/// Change the session user's password. Never touches the users table.
pub async fn update_password(
    identity: &dyn IdentityService,
    id: &str,
    password: &str,
) -> Result<(), ApiError> {
    let mut details = Vec::new();
    if id.trim().is_empty() {
        details.push(FieldViolation::new("id", "this field is required"));
    }
    if password.is_empty() {
        details.push(FieldViolation::new("password", "this field is required"));
    } else if password.len() < MIN_PASSWORD_LENGTH {
        details.push(FieldViolation::new(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    if !details.is_empty() {
        return Err(ApiError::validation("missing required field", details));
    }

    let creds = CredentialsPatch { password: Some(password.to_string()), ..Default::default() };
    identity.update_credentials(creds).await?;
    Ok(())
}

/// Users collaborating on a frame. Fails closed: an error reading the
/// collaborator set aborts before the user select runs.
pub async fn collaborators(store: &dyn Store, frame_id: &str) -> Result<Vec<User>, ApiError> {
    require_id(frame_id, "frame_id")?;
    let ids = store.select_collaborator_ids(frame_id).await?;
    Ok(store.select_users_in(&ids).await?)
}

/// Users NOT collaborating on a frame (candidates to invite).
pub async fn non_collaborators(store: &dyn Store, frame_id: &str) -> Result<Vec<User>, ApiError> {
    require_id(frame_id, "frame_id")?;
    let ids = store.select_collaborator_ids(frame_id).await?;
    Ok(store.select_users_not_in(&ids).await?)
}
