//! HTTP API Client
//!
//! [`AuditApi`] over `fetch`, via gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;

use super::{ApiFailure, AuditApi};
use crate::state::EventRecord;

// ============ Wire Types ============

#[derive(Debug, serde::Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct RegisterResponse {
    token: String,
}

/// Error body; `detail` is usually a string but may be any JSON value
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

// ============ Client ============

/// Browser HTTP client for the audit-log API
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[async_trait(?Send)]
impl AuditApi for HttpApi {
    async fn register_app(&self, name: &str) -> Result<String, ApiFailure> {
        let response = Request::post(&self.url("/api/app/register"))
            .json(&RegisterRequest { name })
            .map_err(|e| ApiFailure::Transport(format!("Request build error: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(server_failure(response).await);
        }

        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| ApiFailure::Transport(format!("Parse error: {}", e)))?;

        Ok(body.token)
    }

    async fn fetch_events(&self, token: &str) -> Result<Vec<EventRecord>, ApiFailure> {
        let response = Request::get(&self.url("/api/events"))
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(server_failure(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiFailure::Transport(format!("Parse error: {}", e)))
    }
}

/// Build the failure for a non-2xx response, keeping the server's `detail`
async fn server_failure(response: Response) -> ApiFailure {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(detail_text);

    web_sys::console::warn_1(
        &format!("API {} -> {} ({:?})", response.url(), status, detail).into(),
    );

    ApiFailure::Server { status, detail }
}

fn detail_text(detail: Value) -> Option<String> {
    match detail {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_text() {
        assert_eq!(detail_text(json!("Name taken")), Some("Name taken".to_string()));
        assert_eq!(detail_text(json!("")), None);
        assert_eq!(detail_text(Value::Null), None);
        assert_eq!(
            detail_text(json!([{"msg": "field required"}])),
            Some(r#"[{"msg":"field required"}]"#.to_string())
        );
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = HttpApi::new("http://localhost:8001");
        assert_eq!(api.url("/api/events"), "http://localhost:8001/api/events");
    }
}
