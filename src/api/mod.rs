//! Audit Log REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Applications
//! - `POST /api/app/register` - Register an application, returns its token
//!
//! ## Events (bearer token required)
//! - `POST /api/event` - Log an event
//! - `GET /api/events` - List the application's events
//!
//! ## Health
//! - `GET /` - Greeting
//! - `GET /health` - Status with store counts
//! - `GET /health/live` - Liveness probe
//!
//! ## Front end (when `api.static_dir` is set)
//! - `GET /static/*` - Built assets
//! - `GET /app` - The front end's `index.html`
//!
//! # Example
//!
//! ```rust,ignore
//! use auditlog::api::{serve, AppState};
//! use auditlog::config::ApiConfig;
//! use auditlog::storage::{Store, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::open(&StoreConfig::new("./auditlog.db"))?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::AuthenticatedApp;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/app/register", post(routes::apps::register_app))
        .route("/event", post(routes::events::log_event))
        .route("/events", get(routes::events::list_events));

    let health_routes = Router::new()
        .route("/", get(routes::health::health))
        .route("/live", get(routes::health::liveness));

    let cors = cors_layer(&state.config);
    let static_dir = state.config.static_dir.clone();

    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .route("/", get(routes::health::welcome))
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    if let Some(dir) = static_dir {
        let dir = Path::new(&dir);
        tracing::info!("Serving front end from {:?}", dir);
        router = router
            .nest_service("/static", ServeDir::new(dir))
            .route_service("/app", ServeFile::new(dir.join("index.html")));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy from the configured origins; an empty list allows any origin
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Audit Log API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Audit Log API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
