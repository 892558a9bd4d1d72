//! # Audit Log
//!
//! A small service that registers applications, issues each one a bearer
//! token, and stores the audit events they send. The browser front end in
//! `auditlog-ui/` talks to this API.
//!
//! ## Modules
//!
//! - [`storage`]: SQLite store for applications and events
//! - [`token`]: Per-application HS256 tokens
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use auditlog::storage::{NewEvent, Store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::open(&StoreConfig::new("./auditlog.db"))?;
//!
//!     let app = store.create_app("billing", &auditlog::token::new_app_secret()).await?;
//!     let token = auditlog::token::issue(&app)?;
//!     println!("token for {}: {}", app.name, token);
//!
//!     store.insert_event(NewEvent::new(app.id, "invoice.created")).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod storage;
pub mod token;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, ConfigWarning, LoadedConfig, LoggingConfig};

pub use storage::{
    AppRecord, EventRecord, NewEvent, StorageError, StorageResult, Store, StoreConfig,
    StoreStats,
};

pub use token::{AppClaims, TokenError};
