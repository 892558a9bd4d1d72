//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("auditlog").join("auditlog.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./auditlog_data/auditlog.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Directory holding the built front end, served under `/static`
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8001".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            static_dir: None,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.expand_paths();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> LoadedConfig {
        let mut config = Config::default();
        let warnings = config.apply_env_overrides();
        LoadedConfig {
            config,
            source: None,
            warnings,
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut config = Self::load(path)?;
        let warnings = config.apply_env_overrides();
        Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        })
    }

    /// Load from the first usable default location, else defaults, with
    /// environment overrides applied either way
    pub fn load_default() -> LoadedConfig {
        let candidates: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("auditlog").join("config.toml")),
            Some(PathBuf::from("/etc/auditlog/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&candidates, |key| std::env::var(key).ok())
    }

    fn load_first(candidates: &[PathBuf], lookup: impl Fn(&str) -> Option<String>) -> LoadedConfig {
        let mut warnings = Vec::new();

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(mut config) => {
                    warnings.extend(config.apply_overrides(&lookup));
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        warnings,
                    };
                }
                Err(e) => warnings.push(ConfigWarning::Skipped(e)),
            }
        }

        let mut config = Config::default();
        warnings.extend(config.apply_overrides(&lookup));
        LoadedConfig {
            config,
            source: None,
            warnings,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Vec<ConfigWarning> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(path) = lookup("AUDITLOG_DATABASE_PATH") {
            self.storage.database_path = path;
        }

        if let Some(host) = lookup("AUDITLOG_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("AUDITLOG_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => warnings.push(ConfigWarning::InvalidEnv {
                    key: "AUDITLOG_PORT",
                    value: port,
                }),
            }
        }
        if let Some(dir) = lookup("AUDITLOG_STATIC_DIR") {
            self.api.static_dir = Some(dir);
        }

        if let Some(level) = lookup("AUDITLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AUDITLOG_LOG_FORMAT") {
            self.logging.format = format;
        }

        self.expand_paths();
        warnings
    }

    fn expand_paths(&mut self) {
        self.storage.database_path = expand_home(&self.storage.database_path);
        if let Some(dir) = &self.api.static_dir {
            self.api.static_dir = Some(expand_home(dir));
        }
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix("~/") {
        Some(rest) => rest,
        None if path == "~" => "",
        None => return path.to_string(),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home.to_string_lossy().to_string(),
        Some(home) => home.join(rest).to_string_lossy().to_string(),
        None => path.to_string(),
    }
}

/// A loaded configuration plus what loading skipped. Loading runs before
/// the subscriber exists, so the caller logs `warnings` afterwards.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the settings came from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Problems that did not stop configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigWarning {
    #[error("Skipped config file: {0}")]
    Skipped(ConfigError),

    #[error("Ignoring invalid {key}={value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Audit Log Configuration
#
# Environment variables override these settings:
# - AUDITLOG_DATABASE_PATH
# - AUDITLOG_HOST
# - AUDITLOG_PORT
# - AUDITLOG_STATIC_DIR
# - AUDITLOG_LOG_LEVEL
# - AUDITLOG_LOG_FORMAT

[storage]
# SQLite database file
database_path = "~/.local/share/auditlog/auditlog.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8001

# Allowed CORS origins (empty list allows any origin)
cors_origins = ["http://localhost:8001", "http://127.0.0.1:8080"]

# Built front end to serve under /static (optional)
# static_dir = "./auditlog-ui/dist"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#
    .to_string()
}
