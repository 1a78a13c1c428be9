use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::models::{
    Column, ColumnPatch, FrameCollaborator, Ticket, TicketAssignee, TicketAssigneePatch,
    TicketPatch, User, UserPatch, UserSummary,
};
use super::{
    CollaboratorStore, ColumnStore, Store, StoreError, TicketAssigneeStore, TicketStore, UserStore,
};

/// In-memory gateway backend. Used by the test suite and the `memory` store
/// backend for local development; per-call atomicity mirrors what the remote
/// store provides.
#[derive(Default)]
pub struct MemoryStore {
    columns: RwLock<HashMap<String, Column>>,
    tickets: RwLock<HashMap<String, Ticket>>,
    ticket_assignees: RwLock<HashMap<String, TicketAssignee>>,
    users: RwLock<HashMap<String, User>>,
    frame_collaborators: RwLock<Vec<FrameCollaborator>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collaborator association. The collaborator table has no CRUD
    /// surface; tests and fixtures populate it directly.
    pub async fn add_collaborator(&self, frame_id: impl Into<String>, user_id: impl Into<String>) {
        self.frame_collaborators
            .write()
            .await
            .push(FrameCollaborator { frame_id: frame_id.into(), user_id: user_id.into() });
    }

    async fn assignees_of(&self, ticket_id: &str) -> Vec<UserSummary> {
        let mut rows: Vec<TicketAssignee> = self
            .ticket_assignees
            .read()
            .await
            .values()
            .filter(|a| a.ticket_id == ticket_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let users = self.users.read().await;
        rows.iter().filter_map(|a| users.get(&a.user_id).map(UserSummary::from)).collect()
    }

    async fn enrich(&self, mut ticket: Ticket) -> Ticket {
        ticket.assignees = self.assignees_of(&ticket.id).await;
        ticket
    }
}

// Stable listing order: creation time, then id as a tiebreaker.
macro_rules! sorted_by_creation {
    ($rows:expr) => {{
        let mut out: Vec<_> = $rows.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        out
    }};
}

#[async_trait]
impl ColumnStore for MemoryStore {
    async fn select_columns(&self) -> Result<Vec<Column>, StoreError> {
        let rows = self.columns.read().await;
        Ok(sorted_by_creation!(rows))
    }

    async fn select_column(&self, id: &str) -> Result<Column, StoreError> {
        self.columns
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("column"))
    }

    async fn insert_column(&self, row: Column) -> Result<Column, StoreError> {
        self.columns.write().await.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update_column(
        &self,
        id: &str,
        patch: ColumnPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Column, StoreError> {
        let mut rows = self.columns.write().await;
        let row = rows.get_mut(id).ok_or_else(|| StoreError::not_found("column"))?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(frame_id) = patch.frame_id {
            row.frame_id = frame_id;
        }
        if let Some(tickets) = patch.tickets {
            row.tickets = tickets;
        }
        row.updated_at = updated_at;
        Ok(row.clone())
    }

    async fn delete_column(&self, id: &str) -> Result<(), StoreError> {
        match self.columns.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("column")),
        }
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn select_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let base = {
            let rows = self.tickets.read().await;
            sorted_by_creation!(rows)
        };
        let mut out = Vec::with_capacity(base.len());
        for ticket in base {
            out.push(self.enrich(ticket).await);
        }
        Ok(out)
    }

    async fn select_ticket(&self, id: &str) -> Result<Ticket, StoreError> {
        let ticket = self
            .tickets
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("ticket"))?;
        Ok(self.enrich(ticket).await)
    }

    async fn insert_ticket(&self, mut row: Ticket) -> Result<Ticket, StoreError> {
        // assignees is a read-side projection; never persisted
        row.assignees = Vec::new();
        self.tickets.write().await.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update_ticket(
        &self,
        id: &str,
        patch: TicketPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Ticket, StoreError> {
        let updated = {
            let mut rows = self.tickets.write().await;
            let row = rows.get_mut(id).ok_or_else(|| StoreError::not_found("ticket"))?;
            if let Some(title) = patch.title {
                row.title = title;
            }
            if let Some(description) = patch.description {
                row.description = description;
            }
            row.updated_at = updated_at;
            row.clone()
        };
        Ok(self.enrich(updated).await)
    }

    async fn delete_ticket(&self, id: &str) -> Result<(), StoreError> {
        match self.tickets.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("ticket")),
        }
    }
}

#[async_trait]
impl TicketAssigneeStore for MemoryStore {
    async fn select_ticket_assignees(&self) -> Result<Vec<TicketAssignee>, StoreError> {
        let rows = self.ticket_assignees.read().await;
        Ok(sorted_by_creation!(rows))
    }

    async fn select_ticket_assignee(&self, id: &str) -> Result<TicketAssignee, StoreError> {
        self.ticket_assignees
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("ticket_assignee"))
    }

    async fn insert_ticket_assignee(
        &self,
        row: TicketAssignee,
    ) -> Result<TicketAssignee, StoreError> {
        let mut rows = self.ticket_assignees.write().await;
        // The backing store owns (ticket_id, user_id) uniqueness; the memory
        // backend mirrors the constraint so tests see the same failure.
        if rows.values().any(|a| a.ticket_id == row.ticket_id && a.user_id == row.user_id) {
            return Err(StoreError::Backend(format!(
                "duplicate assignment of user {} to ticket {}",
                row.user_id, row.ticket_id
            )));
        }
        rows.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update_ticket_assignee(
        &self,
        id: &str,
        patch: TicketAssigneePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<TicketAssignee, StoreError> {
        let mut rows = self.ticket_assignees.write().await;
        let row = rows.get_mut(id).ok_or_else(|| StoreError::not_found("ticket_assignee"))?;
        if let Some(ticket_id) = patch.ticket_id {
            row.ticket_id = ticket_id;
        }
        if let Some(user_id) = patch.user_id {
            row.user_id = user_id;
        }
        row.updated_at = updated_at;
        Ok(row.clone())
    }

    async fn delete_ticket_assignee(&self, id: &str) -> Result<(), StoreError> {
        match self.ticket_assignees.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("ticket_assignee")),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn select_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = self.users.read().await;
        Ok(sorted_by_creation!(rows))
    }

    async fn select_user(&self, id: &str) -> Result<User, StoreError> {
        self.users.read().await.get(id).cloned().ok_or_else(|| StoreError::not_found("user"))
    }

    async fn insert_user(&self, row: User) -> Result<User, StoreError> {
        self.users.write().await.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let mut rows = self.users.write().await;
        let row = rows.get_mut(id).ok_or_else(|| StoreError::not_found("user"))?;
        if let Some(email) = patch.email {
            row.email = email;
        }
        if let Some(first_name) = patch.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            row.last_name = last_name;
        }
        row.updated_at = updated_at;
        Ok(row.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        match self.users.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("user")),
        }
    }

    async fn select_users_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut out = self.select_users().await?;
        out.retain(|u| ids.contains(&u.id));
        Ok(out)
    }

    async fn select_users_not_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        let mut out = self.select_users().await?;
        out.retain(|u| !ids.contains(&u.id));
        Ok(out)
    }
}

#[async_trait]
impl CollaboratorStore for MemoryStore {
    async fn select_collaborator_ids(&self, frame_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .frame_collaborators
            .read()
            .await
            .iter()
            .filter(|c| c.frame_id == frame_id)
            .map(|c| c.user_id.clone())
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
