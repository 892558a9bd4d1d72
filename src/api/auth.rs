//! Bearer Authentication
//!
//! Extractor that turns an `Authorization: Bearer <token>` header into the
//! verified claims of the calling application.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::token::{self, AppClaims};

/// The application a request is authenticated as
#[derive(Debug, Clone)]
pub struct AuthenticatedApp(pub AppClaims);

impl AuthenticatedApp {
    pub fn app_id(&self) -> i64 {
        self.0.app_id
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedApp {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authentication credentials".to_string()))?;

        let claims = token::verify(&state.store, token).await?;

        tracing::debug!(app_id = claims.app_id, "Authenticated request");

        Ok(Self(claims))
    }
}

/// Extract the credentials from a `Bearer` authorization header value
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, credentials) = header.trim().split_once(' ')?;
    let credentials = credentials.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || credentials.is_empty() {
        return None;
    }

    Some(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
