//! Health Routes
//!
//! - GET / - Greeting
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Status with store counts

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, WelcomeResponse};
use crate::api::state::AppState;

/// GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Audit Log API!".to_string(),
    })
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Reports "ok" when the store answers, "degraded" otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = match state.store.stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the store");
            None
        }
    };

    Json(HealthResponse {
        status: if stats.is_some() { "ok" } else { "degraded" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        apps: stats.map(|s| s.apps),
        events: stats.map(|s| s.events),
    })
}
