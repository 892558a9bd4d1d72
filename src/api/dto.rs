//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================
// APP DTOs
// ============================================

/// Application registration request
#[derive(Debug, Deserialize)]
pub struct RegisterAppRequest {
    pub name: String,
}

/// Application registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterAppResponse {
    pub message: String,
    pub app_name: String,
    /// Bearer token for the new application
    pub token: String,
}

// ============================================
// EVENT DTOs
// ============================================

/// Event logging request
#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    /// Event type, 1 to 64 characters
    #[serde(rename = "type")]
    pub event_type: String,
    /// Where the event came from, up to 128 characters
    #[serde(default)]
    pub source: Option<String>,
    /// Free-form payload
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Event logging response
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEventResponse {
    pub status: String,
    /// SHA-256 of the payload
    pub hash: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Root greeting
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded"
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<u64>,
}
