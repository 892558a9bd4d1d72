//! Audit Log Storage
//!
//! Persistence for registered applications and their events:
//!
//! - **types**: Core data structures (AppRecord, NewEvent, EventRecord)
//! - **store**: SQLite-backed store
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use auditlog::storage::{NewEvent, Store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::open(&StoreConfig::new("./auditlog.db"))?;
//!
//!     let app = store.create_app("billing", "secret").await?;
//!     store.insert_event(NewEvent::new(app.id, "invoice.created")).await?;
//!
//!     let events = store.events_for_app(app.id).await?;
//!     println!("{} events", events.len());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use store::{Store, StoreConfig};
pub use types::{
    event_hash, AppRecord, EventRecord, NewEvent, StoreStats, MAX_APP_NAME_LEN,
    MAX_EVENT_SOURCE_LEN, MAX_EVENT_TYPE_LEN,
};
