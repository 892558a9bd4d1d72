//! Audit Log API Server
//!
//! Run with: cargo run --bin auditlog-server -- [--config path] [--host h] [--port p]
//!
//! # Configuration
//!
//! Settings come from the TOML file given with `--config`, else from the
//! first of `~/.config/auditlog/config.toml`, `/etc/auditlog/config.toml`,
//! `./config.toml` that exists. Environment variables override the file:
//! - `AUDITLOG_DATABASE_PATH`: SQLite database file
//! - `AUDITLOG_HOST` / `AUDITLOG_PORT`: Bind address (default 0.0.0.0:8001)
//! - `AUDITLOG_STATIC_DIR`: Built front end to serve under /static
//! - `AUDITLOG_LOG_LEVEL` / `AUDITLOG_LOG_FORMAT`: Logging (info, pretty)
//! - `RUST_LOG`: Overrides the log level filter entirely

use anyhow::Context;
use auditlog::api::{serve, AppState};
use auditlog::config::{generate_default_config, Config, LoggingConfig};
use auditlog::storage::{Store, StoreConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "auditlog-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit log API server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let loaded = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };
    let mut config = loaded.config;

    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    match &loaded.source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Starting Audit Log API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.storage.database_path);

    let store = Store::open(&StoreConfig::new(&config.storage.database_path))
        .context("opening the event store")?;

    match store.stats().await {
        Ok(stats) => tracing::info!("Store ready: {}", stats),
        Err(e) => tracing::warn!("Could not read store stats: {}", e),
    }

    let state = AppState::new(Arc::new(store), config.api.clone());

    serve(state, &config.api).await?;

    tracing::info!("Audit Log API server stopped");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("auditlog={},tower_http=info", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
