// HTTP facade: one handler per entity operation. Handlers parse the
// request, call the operation, and re-emit its result with the
// operation-kind status code; all errors go through ApiError::into_response.
pub mod columns;
pub mod ticket_assignees;
pub mod tickets;
pub mod users;

use std::sync::Arc;

use crate::database::Store;
use crate::identity::IdentityService;

/// Shared handler state: the persistence gateway and the identity service,
/// picked per backend at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityService>) -> Self {
        Self { store, identity }
    }
}
