use chrono::Utc;
use serde_json::Value;

use super::{decode, new_id, require_id};
use crate::database::models::{TicketAssignee, TicketAssigneeCreate, TicketAssigneePatch};
use crate::database::Store;
use crate::error::ApiError;
use crate::schemas::ticket_assignees::{TICKET_ASSIGNEE_CREATE, TICKET_ASSIGNEE_UPDATE};

pub async fn list(store: &dyn Store) -> Result<Vec<TicketAssignee>, ApiError> {
    Ok(store.select_ticket_assignees().await?)
}

pub async fn get(store: &dyn Store, id: &str) -> Result<TicketAssignee, ApiError> {
    require_id(id, "id")?;
    Ok(store.select_ticket_assignee(id).await?)
}

pub async fn create(store: &dyn Store, input: &Value) -> Result<TicketAssignee, ApiError> {
    let normalized = TICKET_ASSIGNEE_CREATE.validate(input)?;
    let body: TicketAssigneeCreate = decode(normalized)?;

    let now = Utc::now();
    let row = TicketAssignee {
        id: new_id(),
        ticket_id: body.ticket_id,
        user_id: body.user_id,
        created_at: now,
        updated_at: now,
    };
    Ok(store.insert_ticket_assignee(row).await?)
}

pub async fn update(
    store: &dyn Store,
    id: &str,
    input: &Value,
) -> Result<TicketAssignee, ApiError> {
    require_id(id, "id")?;
    let normalized = TICKET_ASSIGNEE_UPDATE.validate(input)?;
    let patch: TicketAssigneePatch = decode(normalized)?;
    Ok(store.update_ticket_assignee(id, patch, Utc::now()).await?)
}

pub async fn remove(store: &dyn Store, id: &str) -> Result<(), ApiError> {
    require_id(id, "id")?;
    Ok(store.delete_ticket_assignee(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn create_requires_both_references() {
        let store = MemoryStore::new();
        let err = create(&store, &json!({ "ticket_id": "t1" })).await.unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "user_id");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = MemoryStore::new();
        let row =
            create(&store, &json!({ "ticket_id": "t1", "user_id": "u1" })).await.unwrap();
        assert_eq!(row.created_at, row.updated_at);

        let fetched = get(&store, &row.id).await.unwrap();
        assert_eq!(fetched.ticket_id, "t1");

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let patched = update(&store, &row.id, &json!({ "user_id": "u2" })).await.unwrap();
        assert_eq!(patched.user_id, "u2");
        assert!(patched.updated_at > row.updated_at);

        remove(&store, &row.id).await.unwrap();
        assert!(matches!(get(&store, &row.id).await, Err(ApiError::NotFound(_))));
    }
}
