use crate::core::error::error_body;
use axum::{
    http::{StatusCode, Uri},
    response::Response,
};

pub async fn fallback_handler(uri: Uri) -> Response {
    error_body(
        StatusCode::NOT_FOUND,
        format!("No route for {}", uri.path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::read_json;
    use crate::models::api::ErrorResponse;

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let response = fallback_handler(Uri::from_static("/announce")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = read_json(response).await;
        assert!(!body.success);
        assert_eq!(body.error, "No route for /announce");
    }
}
