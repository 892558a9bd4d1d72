//! Audit Log API access
//!
//! [`AuditApi`] is the seam between the UI state and the network; the
//! browser uses [`HttpApi`], tests substitute their own implementation.

mod client;

pub use client::HttpApi;

use async_trait::async_trait;
use thiserror::Error;

use crate::state::EventRecord;

/// API base used when none was given at build time
pub const DEFAULT_API_BASE: &str = "http://localhost:8001";

/// API base URL, fixed at build time via `AUDITLOG_API_BASE`
pub fn api_base() -> String {
    normalize_base(option_env!("AUDITLOG_API_BASE").unwrap_or(DEFAULT_API_BASE))
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Why an API call did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// The server answered with a non-2xx status
    #[error("server returned status {status}")]
    Server { status: u16, detail: Option<String> },

    /// The request never completed, or the response could not be read
    #[error("{0}")]
    Transport(String),
}

/// Calls the front end makes against the audit-log service
#[async_trait(?Send)]
pub trait AuditApi {
    /// `POST /api/app/register`, returns the issued token
    async fn register_app(&self, name: &str) -> Result<String, ApiFailure>;

    /// `GET /api/events` with the given bearer token
    async fn fetch_events(&self, token: &str) -> Result<Vec<EventRecord>, ApiFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://localhost:8001/"), "http://localhost:8001");
        assert_eq!(normalize_base(" https://audit.example.com// "), "https://audit.example.com");
    }

    #[test]
    fn test_api_base_has_no_trailing_slash() {
        assert!(!api_base().ends_with('/'));
    }
}
