//! Application Routes
//!
//! - POST /api/app/register - Register an application and issue its token

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{RegisterAppRequest, RegisterAppResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::MAX_APP_NAME_LEN;
use crate::token;

/// POST /api/app/register
///
/// Creates the application with a fresh signing secret and returns a
/// token signed with it.
pub async fn register_app(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterAppRequest>,
) -> ApiResult<(StatusCode, Json<RegisterAppResponse>)> {
    let name = validate_app_name(&req.name)?;

    let app = state
        .store
        .create_app(name, &token::new_app_secret())
        .await?;
    let token = token::issue(&app)?;

    tracing::info!(app_id = app.id, app_name = %app.name, "Registered application");

    Ok((
        StatusCode::CREATED,
        Json(RegisterAppResponse {
            message: "Application registered successfully.".to_string(),
            app_name: app.name,
            token,
        }),
    ))
}

fn validate_app_name(raw: &str) -> ApiResult<&str> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ApiError::Validation(
            "Application name cannot be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_APP_NAME_LEN {
        return Err(ApiError::Validation(format!(
            "Application name exceeds maximum length of {} characters",
            MAX_APP_NAME_LEN
        )));
    }

    Ok(name)
}
