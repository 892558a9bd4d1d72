//! SQLite-backed store for applications and their events
//!
//! One connection guarded by an async mutex. Every operation is a short
//! statement, so holding the lock across it is cheap.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::error::{StorageError, StorageResult};
use super::types::{AppRecord, EventRecord, NewEvent, StoreStats};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS apps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        api_key TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        app_id INTEGER NOT NULL REFERENCES apps(id),
        type TEXT NOT NULL,
        source TEXT,
        event_data TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        event_hash TEXT NOT NULL,
        auth_signature TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_events_app_time ON events(app_id, timestamp);
";

const EVENT_COLUMNS: &str =
    "id, app_id, type, source, event_data, timestamp, event_hash, auth_signature";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the SQLite database file
    pub database_path: PathBuf,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }
}

/// Application and event store
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database described by `config`
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let path = &config.database_path;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        Self::init(conn, Some(path.clone()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = ?path, "Store schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register a new application
    pub async fn create_app(&self, name: &str, api_key: &str) -> StorageResult<AppRecord> {
        let created_at = Utc::now();
        let conn = self.conn.lock().await;

        let inserted = conn.execute(
            "INSERT INTO apps (name, api_key, created_at) VALUES (?1, ?2, ?3)",
            params![name, api_key, format_timestamp(&created_at)],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StorageError::AppNameTaken(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(AppRecord {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            api_key: api_key.to_string(),
            created_at,
        })
    }

    /// Look up an application by id
    pub async fn get_app(&self, id: i64) -> StorageResult<Option<AppRecord>> {
        let conn = self.conn.lock().await;
        let app = conn
            .query_row(
                "SELECT id, name, api_key, created_at FROM apps WHERE id = ?1",
                params![id],
                read_app,
            )
            .optional()?;

        app.transpose()
    }

    /// Look up an application by its unique name
    pub async fn get_app_by_name(&self, name: &str) -> StorageResult<Option<AppRecord>> {
        let conn = self.conn.lock().await;
        let app = conn
            .query_row(
                "SELECT id, name, api_key, created_at FROM apps WHERE name = ?1",
                params![name],
                read_app,
            )
            .optional()?;

        app.transpose()
    }

    /// Store an event, stamping it with the current time
    pub async fn insert_event(&self, event: NewEvent) -> StorageResult<EventRecord> {
        let timestamp = Utc::now();
        let event_hash = event.hash()?;
        let data_json = serde_json::to_string(&event.data)?;

        let conn = self.conn.lock().await;

        let inserted = conn.execute(
            "INSERT INTO events (app_id, type, source, event_data, timestamp, event_hash, auth_signature)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.app_id,
                event.event_type,
                event.source,
                data_json,
                format_timestamp(&timestamp),
                event_hash,
                event.auth_signature,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StorageError::AppNotFound(event.app_id));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(EventRecord {
            id: conn.last_insert_rowid(),
            app_id: event.app_id,
            event_type: event.event_type,
            source: event.source,
            event_data: event.data,
            timestamp,
            event_hash,
            auth_signature: event.auth_signature,
        })
    }

    /// All events of one application, newest first
    pub async fn events_for_app(&self, app_id: i64) -> StorageResult<Vec<EventRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM events WHERE app_id = ?1 ORDER BY timestamp DESC, id DESC",
            EVENT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![app_id], read_event)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row??);
        }

        Ok(events)
    }

    /// Row counts for health reporting
    pub async fn stats(&self) -> StorageResult<StoreStats> {
        let conn = self.conn.lock().await;
        let apps: i64 = conn.query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
        let events: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;

        Ok(StoreStats {
            apps: apps as u64,
            events: events as u64,
        })
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corruption(format!("bad timestamp '{}': {}", raw, e)))
}

fn read_app(row: &Row<'_>) -> rusqlite::Result<StorageResult<AppRecord>> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let api_key: String = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(parse_timestamp(&created_at).map(|created_at| AppRecord {
        id,
        name,
        api_key,
        created_at,
    }))
}

fn read_event(row: &Row<'_>) -> rusqlite::Result<StorageResult<EventRecord>> {
    let id: i64 = row.get(0)?;
    let app_id: i64 = row.get(1)?;
    let event_type: String = row.get(2)?;
    let source: Option<String> = row.get(3)?;
    let data_json: String = row.get(4)?;
    let timestamp: String = row.get(5)?;
    let event_hash: String = row.get(6)?;
    let auth_signature: Option<String> = row.get(7)?;

    let decoded = serde_json::from_str(&data_json)
        .map_err(StorageError::from)
        .and_then(|event_data| {
            Ok(EventRecord {
                id,
                app_id,
                event_type,
                source,
                event_data,
                timestamp: parse_timestamp(&timestamp)?,
                event_hash,
                auth_signature,
            })
        });

    Ok(decoded)
}
