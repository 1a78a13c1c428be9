// Client-side data hooks: the same entity operations wrapped in cached
// queries and cache-invalidating mutations.
pub mod cache;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::database::models::{Column, Ticket, TicketAssignee, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::identity::{IdentityService, SessionUser};
use crate::operations;

pub use cache::{QueryCache, QueryKey};

const COLUMNS: &str = "columns";
const TICKETS: &str = "tickets";
const TICKET_ASSIGNEES: &str = "ticket_assignees";
const USERS: &str = "users";
const SESSION: &str = "session";

/// Process-wide query/mutation client. Construct one per client process and
/// keep it for the process lifetime; dropping it tears the cache down with
/// it. Queries consult the cache first; mutations run the operation and, on
/// success, invalidate every cached query for the affected entity so the
/// next read refetches.
pub struct QueryClient {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityService>,
    cache: QueryCache,
}

fn to_cached<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::store(format!("failed to cache query result: {}", e)))
}

fn from_cached<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::store(format!("failed to decode cached query result: {}", e)))
}

impl QueryClient {
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityService>) -> Self {
        Self { store, identity, cache: QueryCache::new() }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn cached_query<T, F>(&self, key: QueryKey, run: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: std::future::Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            return from_cached(hit);
        }
        let fresh = run.await?;
        self.cache.put(key, to_cached(&fresh)?).await;
        Ok(fresh)
    }

    // --- column hooks ---

    pub async fn columns(&self) -> Result<Vec<Column>, ApiError> {
        self.cached_query(
            QueryKey::list(COLUMNS),
            operations::columns::list(self.store.as_ref()),
        )
        .await
    }

    /// By-id query; inactive (returns `None` without touching the store)
    /// until a non-blank id is supplied.
    pub async fn column(&self, id: &str) -> Result<Option<Column>, ApiError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        self.cached_query(
            QueryKey::item(COLUMNS, id),
            operations::columns::get(self.store.as_ref(), id),
        )
        .await
        .map(Some)
    }

    pub async fn create_column(&self, input: &Value) -> Result<Column, ApiError> {
        let row = operations::columns::create(self.store.as_ref(), input).await?;
        self.cache.invalidate(COLUMNS).await;
        Ok(row)
    }

    pub async fn update_column(&self, id: &str, input: &Value) -> Result<Column, ApiError> {
        let row = operations::columns::update(self.store.as_ref(), id, input).await?;
        self.cache.invalidate(COLUMNS).await;
        Ok(row)
    }

    pub async fn delete_column(&self, id: &str) -> Result<(), ApiError> {
        operations::columns::remove(self.store.as_ref(), id).await?;
        self.cache.invalidate(COLUMNS).await;
        Ok(())
    }

    // --- ticket hooks ---

    pub async fn tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.cached_query(
            QueryKey::list(TICKETS),
            operations::tickets::list(self.store.as_ref()),
        )
        .await
    }

    pub async fn ticket(&self, id: &str) -> Result<Option<Ticket>, ApiError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        self.cached_query(
            QueryKey::item(TICKETS, id),
            operations::tickets::get(self.store.as_ref(), id),
        )
        .await
        .map(Some)
    }

    pub async fn create_ticket(&self, input: &Value) -> Result<Ticket, ApiError> {
        let row = operations::tickets::create(self.store.as_ref(), input).await?;
        self.cache.invalidate(TICKETS).await;
        Ok(row)
    }

    pub async fn update_ticket(&self, id: &str, input: &Value) -> Result<Ticket, ApiError> {
        let row = operations::tickets::update(self.store.as_ref(), id, input).await?;
        self.cache.invalidate(TICKETS).await;
        Ok(row)
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<(), ApiError> {
        operations::tickets::remove(self.store.as_ref(), id).await?;
        self.cache.invalidate(TICKETS).await;
        Ok(())
    }

    /// Assignees are a ticket projection, so assignment invalidates both
    /// the assignment entity and tickets.
    pub async fn assign_user_to_ticket(
        &self,
        ticket_id: &str,
        user_id: &str,
    ) -> Result<TicketAssignee, ApiError> {
        let row = operations::tickets::assign(self.store.as_ref(), ticket_id, user_id).await?;
        self.cache.invalidate(TICKETS).await;
        self.cache.invalidate(TICKET_ASSIGNEES).await;
        Ok(row)
    }

    // --- ticket_assignee hooks ---

    pub async fn ticket_assignees(&self) -> Result<Vec<TicketAssignee>, ApiError> {
        self.cached_query(
            QueryKey::list(TICKET_ASSIGNEES),
            operations::ticket_assignees::list(self.store.as_ref()),
        )
        .await
    }

    pub async fn ticket_assignee(&self, id: &str) -> Result<Option<TicketAssignee>, ApiError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        self.cached_query(
            QueryKey::item(TICKET_ASSIGNEES, id),
            operations::ticket_assignees::get(self.store.as_ref(), id),
        )
        .await
        .map(Some)
    }

    pub async fn create_ticket_assignee(&self, input: &Value) -> Result<TicketAssignee, ApiError> {
        let row = operations::ticket_assignees::create(self.store.as_ref(), input).await?;
        self.cache.invalidate(TICKET_ASSIGNEES).await;
        Ok(row)
    }

    pub async fn update_ticket_assignee(
        &self,
        id: &str,
        input: &Value,
    ) -> Result<TicketAssignee, ApiError> {
        let row = operations::ticket_assignees::update(self.store.as_ref(), id, input).await?;
        self.cache.invalidate(TICKET_ASSIGNEES).await;
        Ok(row)
    }

    pub async fn delete_ticket_assignee(&self, id: &str) -> Result<(), ApiError> {
        operations::ticket_assignees::remove(self.store.as_ref(), id).await?;
        self.cache.invalidate(TICKET_ASSIGNEES).await;
        Ok(())
    }

    // --- user hooks ---

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.cached_query(QueryKey::list(USERS), operations::users::list(self.store.as_ref()))
            .await
    }

    pub async fn user(&self, id: &str) -> Result<Option<User>, ApiError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        self.cached_query(
            QueryKey::item(USERS, id),
            operations::users::get(self.store.as_ref(), id),
        )
        .await
        .map(Some)
    }

    pub async fn logged_user(&self) -> Result<Option<SessionUser>, ApiError> {
        self.cached_query(QueryKey::list(SESSION), async {
            Ok(operations::users::logged_user(self.identity.as_ref()).await)
        })
        .await
    }

    pub async fn create_user(&self, input: &Value) -> Result<User, ApiError> {
        let row =
            operations::users::create(self.store.as_ref(), self.identity.as_ref(), input).await?;
        self.cache.invalidate(USERS).await;
        Ok(row)
    }

    pub async fn update_user(&self, id: &str, input: &Value) -> Result<User, ApiError> {
        let row =
            operations::users::update(self.store.as_ref(), self.identity.as_ref(), id, input)
                .await?;
        self.cache.invalidate(USERS).await;
        Ok(row)
    }

    pub async fn update_user_password(&self, id: &str, password: &str) -> Result<(), ApiError> {
        operations::users::update_password(self.identity.as_ref(), id, password).await?;
        self.cache.invalidate(USERS).await;
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        operations::users::remove(self.store.as_ref(), id).await?;
        self.cache.invalidate(USERS).await;
        Ok(())
    }

    pub async fn collaborator_users(&self, frame_id: &str) -> Result<Vec<User>, ApiError> {
        Ok(operations::users::collaborators(self.store.as_ref(), frame_id).await?)
    }

    pub async fn non_collaborator_users(&self, frame_id: &str) -> Result<Vec<User>, ApiError> {
        Ok(operations::users::non_collaborators(self.store.as_ref(), frame_id).await?)
    }
}
