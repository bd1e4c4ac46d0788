//! SQL Injection Lab Web Server
//!
//! Two login forms side by side: one builds its SQL by string interpolation,
//! the other binds parameters. Every submission is classified and recorded,
//! and the monitor page shows the recent history.
//!
//! ## Routes
//!
//! - `GET /` landing page with both forms
//! - `POST /login` vulnerable login
//! - `POST /login-safe` parameterized login
//! - `GET /monitor` live dashboard
//! - `GET /api/logs` JSON feed

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] sqli_db::DbError),
}

pub type Result<T> = std::result::Result<T, WebError>;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/monitor", get(handlers::monitor))
        // Login endpoints
        .route("/login", post(handlers::login_vulnerable))
        .route("/login-safe", post(handlers::login_safe))
        // API
        .route("/api/logs", get(handlers::api_logs))
        .route("/api/logs/clear", post(handlers::api_logs_clear))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("SQL Injection Lab listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
