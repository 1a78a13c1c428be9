use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{password_digest, CredentialsPatch, IdentityError, IdentityService, SessionUser};

/// In-memory identity backend. Holds at most one session, matching the
/// single-client session model of the managed service it stands in for.
#[derive(Default)]
pub struct MemoryIdentity {
    session: RwLock<Option<SessionUser>>,
    digests: RwLock<HashMap<String, String>>,
}

impl MemoryIdentity {
    /// No active session; `update_credentials` will fail with `NoSession`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(user: SessionUser) -> Self {
        Self { session: RwLock::new(Some(user)), digests: RwLock::new(HashMap::new()) }
    }

    /// Stored digest for a user id, if a password was ever set.
    pub async fn digest_of(&self, user_id: &str) -> Option<String> {
        self.digests.read().await.get(user_id).cloned()
    }
}

#[async_trait]
impl IdentityService for MemoryIdentity {
    async fn current_session(&self) -> Result<Option<SessionUser>, IdentityError> {
        Ok(self.session.read().await.clone())
    }

    async fn update_credentials(&self, patch: CredentialsPatch) -> Result<(), IdentityError> {
        let mut session = self.session.write().await;
        let user = session.as_mut().ok_or(IdentityError::NoSession)?;

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(password) = patch.password {
            self.digests.write().await.insert(user.id.clone(), password_digest(&password));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            name: "Ada Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn update_without_session_fails() {
        let identity = MemoryIdentity::new();
        let err = identity
            .update_credentials(CredentialsPatch {
                email: Some("b@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NoSession));
    }

    #[tokio::test]
    async fn credential_patch_updates_session_record() {
        let identity = MemoryIdentity::with_session(session());
        identity
            .update_credentials(CredentialsPatch {
                email: Some("b@x.com".to_string()),
                name: Some("Ada King".to_string()),
                password: Some("mostsecret".to_string()),
            })
            .await
            .unwrap();

        let user = identity.current_session().await.unwrap().unwrap();
        assert_eq!(user.email, "b@x.com");
        assert_eq!(user.name, "Ada King");
        assert!(identity.digest_of("u1").await.is_some());
    }
}
