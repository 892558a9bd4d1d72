//! Core data types for the audit-log store
//!
//! - `AppRecord`: a registered application and its signing secret
//! - `NewEvent` / `EventRecord`: an audit event before and after insertion
//! - `StoreStats`: row counts for health reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::io;

/// Maximum length of an application name
pub const MAX_APP_NAME_LEN: usize = 128;

/// Maximum length of an event type
pub const MAX_EVENT_TYPE_LEN: usize = 64;

/// Maximum length of an event source
pub const MAX_EVENT_SOURCE_LEN: usize = 128;

/// A registered application
///
/// `api_key` is the per-application secret used to sign its tokens.
/// It never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    pub id: i64,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

/// An event about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub app_id: i64,
    pub event_type: String,
    pub source: Option<String>,
    pub data: Map<String, Value>,
    pub auth_signature: Option<String>,
}

impl NewEvent {
    /// Create an event with an empty payload
    pub fn new(app_id: i64, event_type: impl Into<String>) -> Self {
        Self {
            app_id,
            event_type: event_type.into(),
            source: None,
            data: Map::new(),
            auth_signature: None,
        }
    }

    /// Builder method: set the source
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder method: set the payload
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Content hash of the payload
    pub fn hash(&self) -> serde_json::Result<String> {
        event_hash(&self.data)
    }
}

/// A stored event, as returned by `GET /api/events`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub app_id: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: Option<String>,
    pub event_data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub event_hash: String,
    pub auth_signature: Option<String>,
}

/// Row counts across the store
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StoreStats {
    pub apps: u64,
    pub events: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} apps, {} events", self.apps, self.events)
    }
}

/// Lowercase hex SHA-256 of the payload, serialized with keys sorted at
/// every depth, `", "` and `": "` separators, and non-ASCII characters
/// escaped as `\uXXXX`. Matches Python's `json.dumps(data, sort_keys=True)`.
pub fn event_hash(data: &Map<String, Value>) -> serde_json::Result<String> {
    let canonical = canonicalize(&Value::Object(data.clone()));

    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    canonical.serialize(&mut serializer)?;

    Ok(format!("{:x}", Sha256::digest(&buf)))
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// JSON formatter with spaced separators and ASCII-only output
struct SpacedAsciiFormatter;

impl serde_json::ser::Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_hash_ignores_key_order() {
        let a = object(json!({"user": "ana", "action": "login", "meta": {"b": 1, "a": 2}}));
        let b = object(json!({"meta": {"a": 2, "b": 1}, "action": "login", "user": "ana"}));
        assert_eq!(event_hash(&a).unwrap(), event_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_of_empty_payload() {
        // sha256("{}")
        assert_eq!(
            event_hash(&Map::new()).unwrap(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_hash_matches_python_json_dumps() {
        // hashlib.sha256(json.dumps(data, sort_keys=True).encode()).hexdigest()
        let cases = [
            (
                json!({"user": "ana", "amount": 10}),
                "563d3d301f1ba579303398f49a6d3c0800dd310207b3d80cddb068fe0e0bdedf",
            ),
            (
                json!({"name": "Jos\u{e9}", "tags": ["a", {"z": 1, "b": null}], "ok": true}),
                "ac9dcd001e2452992b899a70c1d452b0a05f619ef93ea6a89e67b27c88242884",
            ),
            (
                json!({"emoji": "\u{1F600}"}),
                "77b7a88f85b18c9052b5af61315ec228caf270a5a63fc7ad3ebb5864c9826a20",
            ),
        ];

        for (data, expected) in cases {
            assert_eq!(event_hash(&object(data)).unwrap(), expected);
        }
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = object(json!({"amount": 10}));
        let b = object(json!({"amount": 11}));
        assert_ne!(event_hash(&a).unwrap(), event_hash(&b).unwrap());
    }

    #[test]
    fn test_event_record_json_shape() {
        let record = EventRecord {
            id: 7,
            app_id: 1,
            event_type: "login".to_string(),
            source: None,
            event_data: object(json!({"user": "ana"})),
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            event_hash: "abc".to_string(),
            auth_signature: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["type"], "login");
        assert_eq!(value["event_data"]["user"], "ana");
        assert_eq!(value["timestamp"], "2024-05-01T10:00:00Z");
        assert!(value["source"].is_null());
    }

    #[test]
    fn test_new_event_builder() {
        let event = NewEvent::new(3, "deploy").source("ci");
        assert_eq!(event.app_id, 3);
        assert_eq!(event.source.as_deref(), Some("ci"));
        assert!(event.data.is_empty());
    }
}
