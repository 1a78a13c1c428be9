// Transport-free entity operations: Schema Validator + Persistence Gateway
// composed into named calls. Status codes are assigned by the HTTP facade
// from the operation kind and the error taxonomy.
pub mod columns;
pub mod ticket_assignees;
pub mod tickets;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Blank identifiers are validation failures, uniformly, for every
/// id-taking operation.
pub(crate) fn require_id(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::missing_field(field))
    } else {
        Ok(())
    }
}

/// Decode a schema-normalized map into its typed payload. The schema already
/// checked shape, so a failure here is an internal defect, not client error.
pub(crate) fn decode<T: DeserializeOwned>(normalized: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| ApiError::store(format!("failed to decode validated payload: {}", e)))
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
