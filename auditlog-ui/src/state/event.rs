//! Event Records
//!
//! Events are free-form JSON objects. Only `id`, `timestamp` and `type`
//! are read, and only for the one-line card summary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder shown for a summary field the event does not carry
pub const MISSING_FIELD: &str = "-";

/// One event as returned by `GET /api/events`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord(Map<String, Value>);

impl EventRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display text for a summary field: strings unquoted, other values as
    /// JSON, absent fields as `-`
    pub fn summary_field(&self, key: &str) -> String {
        match self.0.get(key) {
            None => MISSING_FIELD.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn id_text(&self) -> String {
        self.summary_field("id")
    }

    pub fn timestamp_text(&self) -> String {
        self.summary_field("timestamp")
    }

    pub fn type_text(&self) -> String {
        self.summary_field("type")
    }

    /// The whole record, indented two spaces
    pub fn pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| Value::Object(self.0.clone()).to_string())
    }
}

impl From<Map<String, Value>> for EventRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Expansion state of one rendered event card
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Expansion::Expanded
    }

    /// Arrow on the toggle button
    pub fn arrow(self) -> &'static str {
        match self {
            Expansion::Collapsed => "\u{25BC}",
            Expansion::Expanded => "\u{25B2}",
        }
    }
}
