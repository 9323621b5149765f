// Request-level authentication layers and identity extractors

use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::user::User;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// The authenticated caller, freshly read from the user store
#[derive(Debug, Clone)]
pub struct Identity(pub User);

/// Caller for routes that also accept anonymous requests
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<User>);

/// Reject the request unless it carries a valid token for an active user
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = state.auth.authenticate_headers(req.headers())?;
    req.extensions_mut().insert(Identity(user));
    Ok(next.run(req).await)
}

/// Authenticate when an `Authorization` header is present
///
/// A present but invalid header is rejected rather than treated as
/// anonymous, so a broken client never silently loses its privileges.
pub async fn optional_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if req.headers().contains_key(AUTHORIZATION) {
        let user = state.auth.authenticate_headers(req.headers())?;
        req.extensions_mut().insert(Identity(user));
    }
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AuthError::Unauthorized("authentication required".to_string()))
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(
            parts.extensions.get::<Identity>().map(|identity| identity.0.clone()),
        ))
    }
}
