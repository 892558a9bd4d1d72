//! Application Tokens
//!
//! Every registered application gets its own random secret. Tokens are
//! HS256 JWTs carrying the application id and name, signed with that
//! secret. Verification reads the application id from the unverified
//! payload, looks up the secret, then checks the signature against it.

use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{AppRecord, StorageError, Store};

/// Claims carried by an application token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppClaims {
    pub app_id: i64,
    pub name: String,
    /// Optional expiry (seconds since epoch); registration never sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Not a JWT, or the payload lacks an `app_id`
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// The token names an application that does not exist
    #[error("Unknown application: {0}")]
    UnknownApp(i64),

    /// Signature does not match the application's secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The `exp` claim is in the past
    #[error("Token has expired")]
    Expired,

    /// Signing failed
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// Secret lookup failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Generate a fresh per-application signing secret
pub fn new_app_secret() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Issue a token for a registered application
pub fn issue(app: &AppRecord) -> TokenResult<String> {
    let claims = AppClaims {
        app_id: app.id,
        name: app.name.clone(),
        exp: None,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.api_key.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Read the claims without checking the signature
fn peek_claims(token: &str) -> TokenResult<AppClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<AppClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Malformed(e.to_string()))
}

/// Verify a token against the secret of the application it names
pub async fn verify(store: &Store, token: &str) -> TokenResult<AppClaims> {
    let unverified = peek_claims(token)?;

    let app = store
        .get_app(unverified.app_id)
        .await?
        .ok_or(TokenError::UnknownApp(unverified.app_id))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<AppClaims>(
        token,
        &DecodingKey::from_secret(app.api_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_app(name: &str) -> (Store, AppRecord) {
        let store = Store::open_in_memory().unwrap();
        let app = store.create_app(name, &new_app_secret()).await.unwrap();
        (store, app)
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (store, app) = store_with_app("billing").await;

        let token = issue(&app).unwrap();
        let claims = verify(&store, &token).await.unwrap();

        assert_eq!(claims.app_id, app.id);
        assert_eq!(claims.name, "billing");
        assert_eq!(claims.exp, None);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let (store, app) = store_with_app("billing").await;

        let forged = AppRecord {
            api_key: "not-the-secret".to_string(),
            ..app
        };
        let token = issue(&forged).unwrap();

        let err = verify(&store, &token).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[tokio::test]
    async fn test_token_for_unknown_app_rejected() {
        let (store, app) = store_with_app("billing").await;

        let ghost = AppRecord { id: app.id + 1, ..app };
        let token = issue(&ghost).unwrap();

        let err = verify(&store, &token).await.unwrap_err();
        assert!(matches!(err, TokenError::UnknownApp(id) if id == ghost.id));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (store, _app) = store_with_app("billing").await;

        let err = verify(&store, "not.a.jwt").await.unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (store, app) = store_with_app("billing").await;

        let claims = AppClaims {
            app_id: app.id,
            name: app.name.clone(),
            exp: Some(chrono::Utc::now().timestamp() - 3600),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(app.api_key.as_bytes()),
        )
        .unwrap();

        let err = verify(&store, &token).await.unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_secrets_are_unique() {
        assert_ne!(new_app_secret(), new_app_secret());
    }
}
