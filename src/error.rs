// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::StoreError;
use crate::identity::IdentityError;
use crate::schemas::FieldViolation;

/// Closed error taxonomy for the operation boundary. Every failure an
/// operation can produce is one of these; the response shape and status code
/// follow from the variant alone.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation { message: String, details: Vec<FieldViolation> },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error (backing store)
    Store(String),

    // 500 Internal Server Error (identity subsystem)
    Identity(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::Store(msg) => msg,
            ApiError::Identity(msg) => msg,
        }
    }

    /// Convert to JSON response body: `{error}` plus `details` for
    /// validation failures.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, details } => json!({
                "error": message,
                "details": details,
            }),
            _ => json!({ "error": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldViolation>) -> Self {
        ApiError::Validation { message: message.into(), details }
    }

    /// The uniform blank-identifier failure used by every id-taking
    /// operation.
    pub fn missing_field(field: &str) -> Self {
        ApiError::validation(
            "missing required field",
            vec![FieldViolation::new(field, "this field is required")],
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        ApiError::Store(message.into())
    }

    pub fn identity(message: impl Into<String>) -> Self {
        ApiError::Identity(message.into())
    }
}

// Convert collaborator error types to ApiError
impl From<Vec<FieldViolation>> for ApiError {
    fn from(details: Vec<FieldViolation>) -> Self {
        ApiError::validation("validation failed", details)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::not_found(err.to_string()),
            other => {
                tracing::error!("store failure: {}", other);
                ApiError::store(other.to_string())
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        tracing::error!("identity failure: {}", err);
        ApiError::identity(err.to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let validation = ApiError::missing_field("id");
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("ticket not found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::store("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::identity("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_body_carries_every_detail() {
        let err: ApiError = vec![
            FieldViolation::new("name", "this field is required"),
            FieldViolation::new("email", "invalid email format"),
        ]
        .into();
        let body = err.to_json();
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
        assert_eq!(body["details"][0]["field"], "name");
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err: ApiError = StoreError::not_found("column").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json(), json!({ "error": "column not found" }));
    }
}
