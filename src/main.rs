use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use frameboard_api::config::{self, AppConfig, StoreBackend};
use frameboard_api::database::{MemoryStore, PostgresStore};
use frameboard_api::handlers::{columns, ticket_assignees, tickets, users, AppState};
use frameboard_api::identity::{MemoryIdentity, PostgresIdentity, SessionUser};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Frameboard API in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Frameboard API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    match config.store.backend {
        StoreBackend::Memory => {
            // Local development backend: no database required. A fixed
            // session is signed in so the identity surface is exercisable.
            let store = Arc::new(MemoryStore::new());
            let identity = Arc::new(MemoryIdentity::with_session(SessionUser {
                id: "local-session".to_string(),
                email: "dev@frameboard.local".to_string(),
                name: "Local Developer".to_string(),
            }));
            Ok(AppState::new(store, identity))
        }
        StoreBackend::Postgres => {
            let url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL is required for the postgres store backend")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.store.max_connections)
                .connect(&url)
                .await
                .context("failed to connect to postgres")?;
            sqlx::migrate!().run(&pool).await.context("failed to apply migrations")?;

            let store = Arc::new(PostgresStore::new(pool.clone()));
            let identity =
                Arc::new(PostgresIdentity::new(pool, config.identity.session_token.clone()));
            Ok(AppState::new(store, identity))
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(column_routes())
        .merge(ticket_routes())
        .merge(ticket_assignee_routes())
        .merge(user_routes())
        .merge(frame_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn column_routes() -> Router<AppState> {
    Router::new()
        .route("/api/columns", get(columns::list).post(columns::create))
        .route(
            "/api/columns/:id",
            get(columns::get).patch(columns::update).delete(columns::remove),
        )
}

fn ticket_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/api/tickets", get(tickets::list).post(tickets::create))
        .route(
            "/api/tickets/:id",
            get(tickets::get).patch(tickets::update).delete(tickets::remove),
        )
        .route("/api/tickets/:id/assignees", post(tickets::assign))
}

fn ticket_assignee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/ticket_assignees",
            get(ticket_assignees::list).post(ticket_assignees::create),
        )
        .route(
            "/api/ticket_assignees/:id",
            get(ticket_assignees::get)
                .patch(ticket_assignees::update)
                .delete(ticket_assignees::remove),
        )
}

fn user_routes() -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/me", get(users::me))
        .route("/api/users/:id", get(users::get).patch(users::update).delete(users::remove))
        .route("/api/users/:id/password", put(users::update_password))
}

fn frame_routes() -> Router<AppState> {
    Router::new()
        .route("/api/frames/:frame_id/collaborators", get(users::collaborators))
        .route("/api/frames/:frame_id/non_collaborators", get(users::non_collaborators))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Frameboard API",
        "version": version,
        "description": "CRUD backend for the Frameboard project-management app",
        "endpoints": {
            "home": "/",
            "health": "/health",
            "columns": "/api/columns[/:id]",
            "tickets": "/api/tickets[/:id], /api/tickets/:id/assignees",
            "ticket_assignees": "/api/ticket_assignees[/:id]",
            "users": "/api/users[/:id], /api/users/me, /api/users/:id/password",
            "frames": "/api/frames/:frame_id/collaborators, /api/frames/:frame_id/non_collaborators",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
