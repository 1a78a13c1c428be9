use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use super::models::{
    Column, ColumnPatch, Ticket, TicketAssignee, TicketAssigneePatch, TicketPatch, User, UserPatch,
    UserSummary,
};
use super::{
    CollaboratorStore, ColumnStore, Store, StoreError, TicketAssigneeStore, TicketStore, UserStore,
};

/// sqlx-backed gateway. All statements are single-table (plus the assignee
/// join projection on ticket reads); transaction isolation and uniqueness
/// are the database's responsibility.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Ticket reads aggregate assignee summaries in SQL so a listing stays a
// single round trip.
const TICKET_SELECT: &str = r#"
SELECT t.id, t.title, t.description, t."createdAt", t."updatedAt",
       COALESCE(
           json_agg(
               json_build_object(
                   'id', u.id,
                   'first_name', u.first_name,
                   'last_name', u.last_name,
                   'email', u.email
               )
               ORDER BY ta."createdAt", ta.id
           ) FILTER (WHERE u.id IS NOT NULL),
           '[]'::json
       ) AS assignees
FROM tickets t
LEFT JOIN ticket_assignees ta ON ta.ticket_id = t.id
LEFT JOIN users u ON u.id = ta.user_id
"#;

#[derive(FromRow)]
struct TicketJoinRow {
    id: String,
    title: String,
    description: String,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
    assignees: sqlx::types::Json<Vec<UserSummary>>,
}

impl From<TicketJoinRow> for Ticket {
    fn from(row: TicketJoinRow) -> Self {
        Ticket {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            assignees: row.assignees.0,
        }
    }
}

fn required<T>(row: Option<T>, what: &str) -> Result<T, StoreError> {
    row.ok_or_else(|| StoreError::not_found(what))
}

fn affected(result: sqlx::postgres::PgQueryResult, what: &str) -> Result<(), StoreError> {
    if result.rows_affected() == 0 {
        Err(StoreError::not_found(what))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ColumnStore for PostgresStore {
    async fn select_columns(&self) -> Result<Vec<Column>, StoreError> {
        let rows = sqlx::query_as::<_, Column>(
            r#"SELECT * FROM columns ORDER BY "createdAt", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn select_column(&self, id: &str) -> Result<Column, StoreError> {
        let row = sqlx::query_as::<_, Column>("SELECT * FROM columns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        required(row, "column")
    }

    async fn insert_column(&self, row: Column) -> Result<Column, StoreError> {
        let inserted = sqlx::query_as::<_, Column>(
            r#"INSERT INTO columns (id, name, "frameId", tickets, "createdAt", "updatedAt")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.frame_id)
        .bind(&row.tickets)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_column(
        &self,
        id: &str,
        patch: ColumnPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Column, StoreError> {
        // NULL binds leave the column untouched; none of these fields are
        // nullable so COALESCE is unambiguous.
        let row = sqlx::query_as::<_, Column>(
            r#"UPDATE columns
               SET name = COALESCE($2, name),
                   "frameId" = COALESCE($3, "frameId"),
                   tickets = COALESCE($4, tickets),
                   "updatedAt" = $5
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.frame_id)
        .bind(patch.tickets)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        required(row, "column")
    }

    async fn delete_column(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected(result, "column")
    }
}

#[async_trait]
impl TicketStore for PostgresStore {
    async fn select_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let sql = format!(r#"{TICKET_SELECT} GROUP BY t.id ORDER BY t."createdAt", t.id"#);
        let rows = sqlx::query_as::<_, TicketJoinRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn select_ticket(&self, id: &str) -> Result<Ticket, StoreError> {
        let sql = format!("{TICKET_SELECT} WHERE t.id = $1 GROUP BY t.id");
        let row = sqlx::query_as::<_, TicketJoinRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(Ticket::from(required(row, "ticket")?))
    }

    async fn insert_ticket(&self, row: Ticket) -> Result<Ticket, StoreError> {
        sqlx::query(
            r#"INSERT INTO tickets (id, title, description, "createdAt", "updatedAt")
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(&row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        self.select_ticket(&row.id).await
    }

    async fn update_ticket(
        &self,
        id: &str,
        patch: TicketPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Ticket, StoreError> {
        let result = sqlx::query(
            r#"UPDATE tickets
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   "updatedAt" = $4
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        affected(result, "ticket")?;
        self.select_ticket(id).await
    }

    async fn delete_ticket(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected(result, "ticket")
    }
}

#[async_trait]
impl TicketAssigneeStore for PostgresStore {
    async fn select_ticket_assignees(&self) -> Result<Vec<TicketAssignee>, StoreError> {
        let rows = sqlx::query_as::<_, TicketAssignee>(
            r#"SELECT * FROM ticket_assignees ORDER BY "createdAt", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn select_ticket_assignee(&self, id: &str) -> Result<TicketAssignee, StoreError> {
        let row =
            sqlx::query_as::<_, TicketAssignee>("SELECT * FROM ticket_assignees WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        required(row, "ticket_assignee")
    }

    async fn insert_ticket_assignee(
        &self,
        row: TicketAssignee,
    ) -> Result<TicketAssignee, StoreError> {
        let inserted = sqlx::query_as::<_, TicketAssignee>(
            r#"INSERT INTO ticket_assignees (id, ticket_id, user_id, "createdAt", "updatedAt")
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(&row.id)
        .bind(&row.ticket_id)
        .bind(&row.user_id)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_ticket_assignee(
        &self,
        id: &str,
        patch: TicketAssigneePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<TicketAssignee, StoreError> {
        let row = sqlx::query_as::<_, TicketAssignee>(
            r#"UPDATE ticket_assignees
               SET ticket_id = COALESCE($2, ticket_id),
                   user_id = COALESCE($3, user_id),
                   "updatedAt" = $4
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(patch.ticket_id)
        .bind(patch.user_id)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        required(row, "ticket_assignee")
    }

    async fn delete_ticket_assignee(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM ticket_assignees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected(result, "ticket_assignee")
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn select_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_user(&self, id: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        required(row, "user")
    }

    async fn insert_user(&self, row: User) -> Result<User, StoreError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, email, first_name, last_name, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(&row.id)
        .bind(&row.email)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET email = COALESCE($2, email),
                   first_name = COALESCE($3, first_name),
                   last_name = COALESCE($4, last_name),
                   updated_at = $5
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(patch.email)
        .bind(patch.first_name)
        .bind(patch.last_name)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        required(row, "user")
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected(result, "user")
    }

    async fn select_users_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ANY($1) ORDER BY created_at, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn select_users_not_in(&self, ids: &[String]) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE NOT (id = ANY($1)) ORDER BY created_at, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CollaboratorStore for PostgresStore {
    async fn select_collaborator_ids(&self, frame_id: &str) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT user_id FROM frame_collaborators WHERE frame_id = $1")
            .bind(frame_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row: PgRow| row.try_get::<String, _>("user_id").map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
