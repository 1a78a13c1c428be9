use async_trait::async_trait;
use sqlx::PgPool;

use super::{password_digest, CredentialsPatch, IdentityError, IdentityService, SessionUser};

/// Postgres-backed identity service. The session is selected by a token
/// provisioned out of band (FRAMEBOARD_SESSION_TOKEN); without one there is
/// no signed-in user.
pub struct PostgresIdentity {
    pool: PgPool,
    session_token: Option<String>,
}

impl PostgresIdentity {
    pub fn new(pool: PgPool, session_token: Option<String>) -> Self {
        Self { pool, session_token }
    }

    async fn session_user(&self) -> Result<Option<SessionUser>, IdentityError> {
        let token = match &self.session_token {
            Some(token) => token,
            None => return Ok(None),
        };

        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"SELECT u.id, u.email, u.name
               FROM identity_sessions s
               JOIN identity_users u ON u.id = s.user_id
               WHERE s.token = $1"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| SessionUser { id: r.id, email: r.email, name: r.name }))
    }
}

#[derive(sqlx::FromRow)]
struct SessionUserRow {
    id: String,
    email: String,
    name: String,
}

#[async_trait]
impl IdentityService for PostgresIdentity {
    async fn current_session(&self) -> Result<Option<SessionUser>, IdentityError> {
        self.session_user().await
    }

    async fn update_credentials(&self, patch: CredentialsPatch) -> Result<(), IdentityError> {
        let user = self.session_user().await?.ok_or(IdentityError::NoSession)?;

        let digest = patch.password.as_deref().map(password_digest);
        sqlx::query(
            r#"UPDATE identity_users
               SET email = COALESCE($2, email),
                   name = COALESCE($3, name),
                   password_digest = COALESCE($4, password_digest)
               WHERE id = $1"#,
        )
        .bind(&user.id)
        .bind(patch.email)
        .bind(patch.name)
        .bind(digest)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
