pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryStore;
pub use models::{
    Column, ColumnPatch, Ticket, TicketAssignee, TicketAssigneePatch, TicketPatch, User, UserPatch,
};
pub use postgres::PostgresStore;

/// Errors from the persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }
}

/// Column table operations. Inserts take fully-formed rows: ids and
/// timestamps are assigned by the operation layer, never by the store.
#[async_trait]
pub trait ColumnStore {
    async fn select_columns(&self) -> Result<Vec<Column>, StoreError>;
    async fn select_column(&self, id: &str) -> Result<Column, StoreError>;
    async fn insert_column(&self, row: Column) -> Result<Column, StoreError>;
    async fn update_column(
        &self,
        id: &str,
        patch: ColumnPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Column, StoreError>;
    async fn delete_column(&self, id: &str) -> Result<(), StoreError>;
}

/// Ticket table operations. Reads carry the relational-join projection:
/// every returned ticket has its `assignees` list attached.
#[async_trait]
pub trait TicketStore {
    async fn select_tickets(&self) -> Result<Vec<Ticket>, StoreError>;
    async fn select_ticket(&self, id: &str) -> Result<Ticket, StoreError>;
    async fn insert_ticket(&self, row: Ticket) -> Result<Ticket, StoreError>;
    async fn update_ticket(
        &self,
        id: &str,
        patch: TicketPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Ticket, StoreError>;
    async fn delete_ticket(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TicketAssigneeStore {
    async fn select_ticket_assignees(&self) -> Result<Vec<TicketAssignee>, StoreError>;
    async fn select_ticket_assignee(&self, id: &str) -> Result<TicketAssignee, StoreError>;
    async fn insert_ticket_assignee(&self, row: TicketAssignee)
        -> Result<TicketAssignee, StoreError>;
    async fn update_ticket_assignee(
        &self,
        id: &str,
        patch: TicketAssigneePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<TicketAssignee, StoreError>;
    async fn delete_ticket_assignee(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore {
    async fn select_users(&self) -> Result<Vec<User>, StoreError>;
    async fn select_user(&self, id: &str) -> Result<User, StoreError>;
    async fn insert_user(&self, row: User) -> Result<User, StoreError>;
    async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;
    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;
    /// Users whose id is in `ids`. An empty set selects nothing.
    async fn select_users_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError>;
    /// Users whose id is NOT in `ids`. An empty set selects everyone.
    async fn select_users_not_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError>;
}

/// Derived-query surface over the frame_collaborators join table.
#[async_trait]
pub trait CollaboratorStore {
    async fn select_collaborator_ids(&self, frame_id: &str) -> Result<Vec<String>, StoreError>;
}

/// The full persistence gateway: one object per backend.
#[async_trait]
pub trait Store:
    ColumnStore + TicketStore + TicketAssigneeStore + UserStore + CollaboratorStore + Send + Sync
{
    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
