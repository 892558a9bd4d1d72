//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes. Every error body is
//! `{"detail": "<message>"}`, which is what the front end displays.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;
use crate::token::TokenError;

/// Message returned for every credential failure except expiry
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or unusable bearer credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token verification failed
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    /// Status code and client-facing message
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Token(TokenError::Storage(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Token(TokenError::Expired) => {
                (StatusCode::UNAUTHORIZED, TokenError::Expired.to_string())
            }
            ApiError::Token(TokenError::Signing(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Token(_) => (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS.to_string()),
            ApiError::Storage(e @ StorageError::AppNameTaken(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "API error occurred");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse { detail });

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let (status, detail) = ApiError::Validation("name is required".into()).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "name is required");
    }

    #[test]
    fn test_token_errors_hide_reason() {
        let (status, detail) =
            ApiError::Token(TokenError::InvalidSignature).status_and_detail();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(detail, INVALID_CREDENTIALS);

        let (status, detail) = ApiError::Token(TokenError::Expired).status_and_detail();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(detail, "Token has expired");
    }

    #[test]
    fn test_duplicate_name_is_client_error() {
        let err = ApiError::Storage(StorageError::AppNameTaken("billing".into()));
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "Application name 'billing' is already registered");
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = ApiError::Unauthorized(INVALID_CREDENTIALS.into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
