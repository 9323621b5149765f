// Centralized error handling for the identity service

use crate::models::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors raised by the user store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User with login '{0}' already exists")]
    AlreadyExists(String),

    #[error("User with id '{0}' already exists")]
    DuplicateId(String),

    #[error("User not found")]
    NotFound,

    #[error("No user ids left after '{0}'")]
    IdsExhausted(i64),

    #[error("Failed to access user document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed user document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("User store lock poisoned")]
    LockPoisoned,
}

/// Errors raised while issuing or verifying bearer tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Errors surfaced by the authentication gate and the login operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(detail) => AuthError::Internal(detail),
            other => AuthError::Unauthorized(other.to_string()),
        }
    }
}

/// Policy denial; the reason is safe to show to the caller
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0}")]
pub struct Denied(pub &'static str);

/// Errors surfaced by the registration and update workflows
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<Denied> for AccountError {
    fn from(denied: Denied) -> Self {
        AccountError::Forbidden(denied.0.to_string())
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(_) => AccountError::Conflict("Login already taken".to_string()),
            StoreError::NotFound => AccountError::NotFound,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

pub fn error_body(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AuthError::Internal(detail) => {
                error!(error = %detail, "Authentication failed internally");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        error_body(status, message)
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AccountError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AccountError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AccountError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AccountError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AccountError::Internal(detail) => {
                error!(error = %detail, "Account operation failed internally");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        error_body(status, message)
    }
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        error_body(StatusCode::FORBIDDEN, format!("Forbidden: {}", self.0))
    }
}
