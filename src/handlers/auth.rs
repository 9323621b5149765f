use crate::accounts::registration::register;
use crate::auth::middleware::MaybeIdentity;
use crate::core::error::{error_body, AccountError};
use crate::core::state::AppState;
use crate::models::api::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::UserView;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::info;

/// Exchange credentials for a bearer token
///
/// POST /login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_body(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match state.auth.login(&request.login, &request.password) {
        Ok((token, user)) => {
            info!(user_id = %user.id, login = %user.login, role = %user.role, "User logged in");
            (
                StatusCode::OK,
                Json(LoginResponse {
                    token,
                    user: user.into(),
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a user; anonymous callers may only sign up as `user`
///
/// POST /register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(caller): MaybeIdentity,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, AccountError> {
    let Json(candidate) = payload.map_err(|r| AccountError::BadRequest(r.body_text()))?;

    let user = register(&state.users, caller.as_ref(), &candidate)?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))).into_response())
}
