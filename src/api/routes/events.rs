//! Event Routes
//!
//! Both endpoints require `Authorization: Bearer <token>`.
//!
//! - POST /api/event - Log an event for the calling application
//! - GET /api/events - List the calling application's events, newest first

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::auth::AuthenticatedApp;
use crate::api::dto::{LogEventRequest, LogEventResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::{EventRecord, NewEvent, MAX_EVENT_SOURCE_LEN, MAX_EVENT_TYPE_LEN};

/// POST /api/event
pub async fn log_event(
    State(state): State<Arc<AppState>>,
    app: AuthenticatedApp,
    Json(req): Json<LogEventRequest>,
) -> ApiResult<(StatusCode, Json<LogEventResponse>)> {
    validate_log_request(&req)?;

    let mut event = NewEvent::new(app.app_id(), req.event_type).data(req.data);
    if let Some(source) = req.source {
        event = event.source(source);
    }

    let stored = state.store.insert_event(event).await?;

    tracing::info!(
        app_id = stored.app_id,
        event_id = stored.id,
        event_type = %stored.event_type,
        "Logged event"
    );

    Ok((
        StatusCode::CREATED,
        Json(LogEventResponse {
            status: "event logged successfully".to_string(),
            hash: stored.event_hash,
        }),
    ))
}

/// GET /api/events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    app: AuthenticatedApp,
) -> ApiResult<Json<Vec<EventRecord>>> {
    let events = state.store.events_for_app(app.app_id()).await?;

    tracing::debug!(app_id = app.app_id(), count = events.len(), "Listed events");

    Ok(Json(events))
}

fn validate_log_request(req: &LogEventRequest) -> ApiResult<()> {
    let type_len = req.event_type.chars().count();
    if type_len == 0 || type_len > MAX_EVENT_TYPE_LEN {
        return Err(ApiError::Validation(format!(
            "Event type must be between 1 and {} characters",
            MAX_EVENT_TYPE_LEN
        )));
    }

    if let Some(source) = &req.source {
        if source.chars().count() > MAX_EVENT_SOURCE_LEN {
            return Err(ApiError::Validation(format!(
                "Event source exceeds maximum length of {} characters",
                MAX_EVENT_SOURCE_LEN
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn request(event_type: &str, source: Option<&str>) -> LogEventRequest {
        LogEventRequest {
            event_type: event_type.to_string(),
            source: source.map(str::to_string),
            data: Map::new(),
        }
    }

    #[test]
    fn test_validate_log_request() {
        assert!(validate_log_request(&request("login", None)).is_ok());
        assert!(validate_log_request(&request("", None)).is_err());
        assert!(validate_log_request(&request(&"t".repeat(65), None)).is_err());
        assert!(validate_log_request(&request("login", Some(&"s".repeat(129)))).is_err());
        assert!(validate_log_request(&request("login", Some("web"))).is_ok());
    }
}
