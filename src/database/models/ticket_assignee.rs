use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Join row linking exactly one ticket to one user. Uniqueness of
/// (ticket_id, user_id) is enforced by the backing store, not here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketAssignee {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    #[serde(rename = "createdAt")]
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketAssigneeCreate {
    pub ticket_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketAssigneePatch {
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
