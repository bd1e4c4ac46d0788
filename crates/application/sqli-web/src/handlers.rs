//! Route handlers for the lab

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use sqli_core::{rule_hits, summarize, AttemptRecord, Channel, Outcome};
use sqli_db::LoginAttempt;

use crate::extract::Credentials;
use crate::state::AppState;
use crate::templates;

// ============== Page Handlers ==============

/// Landing page with both login forms
pub async fn index() -> impl IntoResponse {
    Html(templates::index_html())
}

/// Monitoring dashboard
pub async fn monitor(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let records = state.recorder.snapshot();
    let summary = summarize(&records);
    let hits = rule_hits(&records);
    Html(templates::monitor_html(
        &records,
        &summary,
        &hits,
        state.monitor_refresh_secs,
    ))
}

// ============== Login Handlers ==============

/// Login that interpolates credentials into the SQL text
pub async fn login_vulnerable(
    State(state): State<Arc<AppState>>,
    credentials: Credentials,
) -> Response {
    handle_login(state, Channel::Vulnerable, credentials).await
}

/// Login with bound parameters
pub async fn login_safe(
    State(state): State<Arc<AppState>>,
    credentials: Credentials,
) -> Response {
    handle_login(state, Channel::Safe, credentials).await
}

async fn handle_login(state: Arc<AppState>, channel: Channel, credentials: Credentials) -> Response {
    let attempt = run_lookup(&state, channel, &credentials).await;

    let record = state.recorder.record_attempt(
        channel,
        &credentials.username,
        &credentials.password,
        attempt.outcome,
        attempt.raw_query.as_deref(),
    );

    let status = match attempt.outcome {
        Outcome::Error => StatusCode::INTERNAL_SERVER_ERROR,
        Outcome::Success | Outcome::Failed => StatusCode::OK,
    };

    (
        status,
        Html(templates::result_html(&record, attempt.user.as_ref())),
    )
        .into_response()
}

// rusqlite is blocking; keep it off the async workers
async fn run_lookup(state: &AppState, channel: Channel, credentials: &Credentials) -> LoginAttempt {
    let users = Arc::clone(&state.users);
    let username = credentials.username.clone();
    let password = credentials.password.clone();

    match tokio::task::spawn_blocking(move || users.login(channel, &username, &password)).await {
        Ok(attempt) => attempt,
        Err(e) => {
            tracing::error!(channel = %channel, "login task failed: {}", e);
            LoginAttempt {
                outcome: Outcome::Error,
                user: None,
                raw_query: None,
            }
        }
    }
}

// ============== API Handlers ==============

/// JSON feed: counts plus every stored record, oldest first
#[derive(Debug, Serialize)]
pub struct LogsFeed {
    pub total: usize,
    pub attacks: usize,
    pub legitimate: usize,
    pub logs: Vec<AttemptRecord>,
}

impl LogsFeed {
    pub fn from_records(logs: Vec<AttemptRecord>) -> Self {
        let summary = summarize(&logs);
        Self {
            total: summary.total,
            attacks: summary.attacks,
            legitimate: summary.legitimate,
            logs,
        }
    }
}

/// Structured log feed
pub async fn api_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(LogsFeed::from_records(state.recorder.snapshot()))
}

/// Empty the log; returns the counts that were dropped
pub async fn api_logs_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cleared = state.recorder.summary();
    state.recorder.clear();
    Json(serde_json::json!({
        "cleared": cleared.total,
        "attacks": cleared.attacks,
        "legitimate": cleared.legitimate
    }))
}

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "sqli-web",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "log_size": state.recorder.size(),
        "log_capacity": state.recorder.capacity()
    }))
}
