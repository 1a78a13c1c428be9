// Identity/session subsystem: a call surface separate from the user table.
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use memory::MemoryIdentity;
pub use postgres::PostgresIdentity;

/// Errors from the identity subsystem
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no active session")]
    NoSession,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),
}

/// The identity subsystem's view of the signed-in user. Distinct from the
/// profile row in the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Credential changes applied to the current session's identity record.
#[derive(Debug, Clone, Default)]
pub struct CredentialsPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// The user attached to the current session, if any.
    async fn current_session(&self) -> Result<Option<SessionUser>, IdentityError>;

    /// Apply credential changes to the current session's identity record.
    /// Fails with `NoSession` when nobody is signed in.
    async fn update_credentials(&self, patch: CredentialsPatch) -> Result<(), IdentityError>;
}

/// Passwords are stored as hex sha-256 digests, never in the clear.
pub(crate) fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
