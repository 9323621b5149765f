use crate::auth::credentials::CredentialVerifier;
use crate::auth::token::TokenService;
use crate::core::error::{AuthError, StoreError};
use crate::models::user::User;
use crate::stores::user_store::UserStore;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;
use tracing::warn;

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Authentication gate and login
///
/// Tokens only prove identity and freshness. Status and role always come
/// from the store at request time, so freezing or deleting a user takes
/// effect on their very next request even though their token stays valid.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(
        users: Arc<UserStore>,
        tokens: Arc<TokenService>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            users,
            tokens,
            credentials,
        }
    }

    /// Resolve a bearer token to the caller's current, active record
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;

        let user = self.users.get_by_id(&claims.sub).map_err(|e| match e {
            StoreError::NotFound => AuthError::Unauthorized("user not found".to_string()),
            other => AuthError::Internal(other.to_string()),
        })?;

        if !user.is_active() {
            return Err(AuthError::Forbidden(format!("user is {}", user.status)));
        }

        Ok(user)
    }

    /// Authenticate the `Authorization: Bearer <token>` header
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        let token = bearer_token(headers)?;
        self.authenticate(token)
    }

    /// Check credentials and issue a token for an active user
    ///
    /// Unknown login and wrong password produce the same error.
    pub fn login(&self, login: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = match self.users.get_by_login(login) {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                return Err(AuthError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(other) => return Err(AuthError::Internal(other.to_string())),
        };

        if !self.credentials.verify(&user.password, password) {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AuthError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active() {
            return Err(AuthError::Forbidden(format!("user is {}", user.status)));
        }

        let token = self.tokens.issue(&user.id, &user.login)?;
        Ok((token, user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::Unauthorized("authorization header is required".to_string()))?;

    let header = header
        .to_str()
        .map_err(|_| AuthError::Unauthorized("invalid authorization header format".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Unauthorized("invalid authorization header format".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthorized("invalid authorization header format".to_string()));
    }

    Ok(token)
}
