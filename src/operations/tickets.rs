use chrono::Utc;
use serde_json::Value;

use super::{decode, new_id, require_id};
use crate::database::models::{Ticket, TicketAssignee, TicketCreate, TicketPatch};
use crate::database::Store;
use crate::error::ApiError;
use crate::schemas::tickets::{TICKET_CREATE, TICKET_UPDATE};
use crate::schemas::FieldViolation;

pub async fn list(store: &dyn Store) -> Result<Vec<Ticket>, ApiError> {
    Ok(store.select_tickets().await?)
}

pub async fn get(store: &dyn Store, id: &str) -> Result<Ticket, ApiError> {
    require_id(id, "id")?;
    Ok(store.select_ticket(id).await?)
}

pub async fn create(store: &dyn Store, input: &Value) -> Result<Ticket, ApiError> {
    let normalized = TICKET_CREATE.validate(input)?;
    let body: TicketCreate = decode(normalized)?;

    let now = Utc::now();
    let row = Ticket {
        id: new_id(),
        title: body.title,
        description: body.description,
        created_at: now,
        updated_at: now,
        assignees: Vec::new(),
    };
    Ok(store.insert_ticket(row).await?)
}

pub async fn update(store: &dyn Store, id: &str, input: &Value) -> Result<Ticket, ApiError> {
    require_id(id, "id")?;
    let normalized = TICKET_UPDATE.validate(input)?;
    let patch: TicketPatch = decode(normalized)?;
    Ok(store.update_ticket(id, patch, Utc::now()).await?)
}

pub async fn remove(store: &dyn Store, id: &str) -> Result<(), ApiError> {
    require_id(id, "id")?;
    Ok(store.delete_ticket(id).await?)
}

/// Link a user to a ticket. Both ids are validated together so the client
/// sees every blank field in one response.
pub async fn assign(
    store: &dyn Store,
    ticket_id: &str,
    user_id: &str,
) -> Result<TicketAssignee, ApiError> {
    let mut details = Vec::new();
    if ticket_id.trim().is_empty() {
        details.push(FieldViolation::new("ticket_id", "this field is required"));
    }
    if user_id.trim().is_empty() {
        details.push(FieldViolation::new("user_id", "this field is required"));
    }
    if !details.is_empty() {
        return Err(ApiError::validation("missing required field", details));
    }

    let now = Utc::now();
    let row = TicketAssignee {
        id: new_id(),
        ticket_id: ticket_id.to_string(),
        user_id: user_id.to_string(),
        created_at: now,
        updated_at: now,
    };
    Ok(store.insert_ticket_assignee(row).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::operations::users;
    use serde_json::json;

    async fn seed_user(store: &MemoryStore, email: &str) -> String {
        let identity = crate::identity::MemoryIdentity::new();
        users::create(
            store,
            &identity,
            &json!({ "email": email, "first_name": "Test", "last_name": "User" }),
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn assignment_shows_up_on_the_next_read() {
        let store = MemoryStore::new();
        let ticket = create(&store, &json!({ "title": "fix login" })).await.unwrap();
        let u1 = seed_user(&store, "a@x.com").await;
        let u2 = seed_user(&store, "b@x.com").await;

        assign(&store, &ticket.id, &u1).await.unwrap();
        assign(&store, &ticket.id, &u2).await.unwrap();

        let read = get(&store, &ticket.id).await.unwrap();
        assert_eq!(read.assignees.len(), 2);
        let emails: Vec<&str> = read.assignees.iter().map(|a| a.email.as_str()).collect();
        assert!(emails.contains(&"a@x.com"));
        assert!(emails.contains(&"b@x.com"));
    }

    #[tokio::test]
    async fn assign_reports_both_blank_ids() {
        let store = MemoryStore::new();
        let err = assign(&store, "", " ").await.unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                let fields: Vec<&str> = details.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["ticket_id", "user_id"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn description_defaults_to_empty() {
        let store = MemoryStore::new();
        let ticket = create(&store, &json!({ "title": "t" })).await.unwrap();
        assert_eq!(ticket.description, "");
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let store = MemoryStore::new();
        let ticket = create(&store, &json!({ "title": "t" })).await.unwrap();
        assert!(matches!(
            update(&store, &ticket.id, &json!({})).await,
            Err(ApiError::Validation { .. })
        ));
    }
}
