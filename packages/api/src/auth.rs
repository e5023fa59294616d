// ABOUTME: Shared-secret authentication middleware
// ABOUTME: Rejects requests whose x-api-key header does not match the configured key

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::AppState;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// The configured shared secret
#[derive(Clone)]
pub struct ApiKey(pub Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Constant-time comparison against a presented key
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl FromRef<AppState> for ApiKey {
    fn from_ref(state: &AppState) -> Self {
        state.api_key.clone()
    }
}

/// Runs before every handler; a missing or wrong key never reaches the route
pub async fn api_key_middleware(
    State(api_key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if api_key.matches(key) => {
            debug!(path = %path, "API key validated");
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!(path = %path, "Invalid API key provided");
            Err(AppError::Unauthorized)
        }
        None => {
            warn!(path = %path, "Missing API key");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn create_test_app() -> Router {
        let key = ApiKey::new("s3cret");
        Router::new()
            .route("/api/test", get(test_handler))
            .layer(middleware::from_fn_with_state(key.clone(), api_key_middleware))
            .with_state(key)
    }

    async fn status_for(header: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri("/api/test");
        if let Some(value) = header {
            builder = builder.header(API_KEY_HEADER, value);
        }
        let response = create_test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_missing_key_returns_401() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_key_returns_401() {
        assert_eq!(status_for(Some("s3cre")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(Some("s3cret!")).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_key_allows_access() {
        assert_eq!(status_for(Some("s3cret")).await, StatusCode::OK);
    }

    #[test]
    fn test_matches_is_exact() {
        let key = ApiKey::new("abc");
        assert!(key.matches("abc"));
        assert!(!key.matches("ABC"));
        assert!(!key.matches(""));
    }
}
