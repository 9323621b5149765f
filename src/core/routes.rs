// HTTP routes configuration

use crate::auth::middleware::{optional_identity, require_identity};
use crate::core::state::AppState;
use crate::handlers::{auth, fallback, health, users};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Bearer token required, caller re-read from the store on every request
    let protected = Router::new()
        .route("/users", get(users::list_users_handler))
        .route(
            "/users/{id}",
            get(users::get_user_handler).put(users::update_user_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity));

    // Anonymous signup, or registration on behalf of an authenticated staff member
    let registration = Router::new()
        .route("/register", post(auth::register_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_identity));

    Router::new()
        // Public endpoints
        .route("/health", get(health::health_handler))
        .route("/login", post(auth::login_handler))
        .merge(registration)
        .merge(protected)
        // 404 fallback for all unmatched routes
        .fallback(fallback::fallback_handler)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{create_test_state, read_json, TestApp, PASSWORD};
    use crate::models::api::{ErrorResponse, LoginResponse};
    use crate::models::user::{Role, Status, UserView};
    use crate::utils::time::SECONDS_PER_HOUR;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &TestApp, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        build_router(app.state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = create_test_state();
        let response = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_then_list() {
        let app = create_test_state();
        app.seed("admin", Role::Admin, "north");
        app.seed("learner", Role::User, "north");
        app.seed("southern", Role::User, "south");

        let response = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"login": "admin", "password": PASSWORD})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = read_json(response).await;

        let response = send(&app, Method::GET, "/users", Some(&login.token), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let views: Vec<UserView> = read_json(response).await;
        let logins: Vec<&str> = views.iter().map(|v| v.login.as_str()).collect();
        assert_eq!(logins, vec!["admin", "learner"]);
    }

    #[tokio::test]
    async fn test_users_require_token() {
        let app = create_test_state();

        let response = send(&app, Method::GET, "/users", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorResponse = read_json(response).await;
        assert!(!body.success);

        let response = send(&app, Method::GET, "/users", Some("not-a-jwt"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_frozen_caller_is_forbidden_with_valid_token() {
        let app = create_test_state();
        let admin = app.seed("admin", Role::Admin, "north");
        let token = app.token_for(&admin);
        app.set_status(&admin.id, Status::Frozen);

        let response = send(&app, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_token_expires_after_ttl() {
        let app = create_test_state();
        let admin = app.seed("admin", Role::Admin, "north");
        let token = app.token_for(&admin);

        app.clock.advance_secs(24 * SECONDS_PER_HOUR);

        let response = send(&app, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_registration() {
        let app = create_test_state();

        let response = send(
            &app,
            Method::POST,
            "/register",
            None,
            Some(json!({
                "login": "newbie",
                "password": "secret1",
                "name": "New Bie",
                "filial": "north",
                "role": "user"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let view: Value = read_json(response).await;
        assert_eq!(view["status"], "active");
        assert!(view.get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_with_bad_token_is_rejected() {
        let app = create_test_state();

        let response = send(
            &app,
            Method::POST,
            "/register",
            Some("garbage"),
            Some(json!({
                "login": "newbie",
                "password": "secret1",
                "name": "New Bie",
                "filial": "north",
                "role": "user"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(app.state.users.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_admin_registers_tutor_in_own_filial() {
        let app = create_test_state();
        let admin = app.seed("admin", Role::Admin, "north");
        let token = app.token_for(&admin);

        let candidate = |filial: &str| {
            json!({
                "login": format!("tutor-{}", filial),
                "password": "secret1",
                "name": "Tutor",
                "filial": filial,
                "role": "tutor"
            })
        };

        let response = send(&app, Method::POST, "/register", Some(&token), Some(candidate("north"))).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(&app, Method::POST, "/register", Some(&token), Some(candidate("south"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_missing_fields_and_bad_json() {
        let app = create_test_state();

        let response = send(&app, Method::POST, "/register", None, Some(json!({"login": "x"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::POST, "/register", None, Some(json!([1, 2, 3]))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(response).await;
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_update_route() {
        let app = create_test_state();
        let owner = app.seed("owner", Role::Owner, "hq");
        let learner = app.seed("learner", Role::User, "north");
        let token = app.token_for(&owner);
        let uri = format!("/users/{}", learner.id);

        let response = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "frozen"}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, &uri, Some(&token), None).await;
        let view: UserView = read_json(response).await;
        assert_eq!(view.status, Status::Frozen);

        let response = send(&app, Method::PUT, "/users/missing", Some(&token), Some(json!({"name": "x"}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = create_test_state();

        let response = send(&app, Method::GET, "/announce", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = read_json(response).await;
        assert!(!body.success);
    }
}
