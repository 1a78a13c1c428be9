use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A board column. `tickets` is the ordered sequence of ticket ids the UI
/// renders top to bottom; ordering is owned by the client, not this layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "frameId")]
    #[sqlx(rename = "frameId")]
    pub frame_id: String,
    pub tickets: Vec<String>,
    #[serde(rename = "createdAt")]
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated create payload. Timestamps and id are server-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnCreate {
    pub name: String,
    #[serde(rename = "frameId")]
    pub frame_id: String,
    #[serde(default)]
    pub tickets: Vec<String>,
}

/// Validated partial-update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "frameId")]
    pub frame_id: Option<String>,
    #[serde(default)]
    pub tickets: Option<Vec<String>>,
}
