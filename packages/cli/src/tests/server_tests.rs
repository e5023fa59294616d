use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use kroolo_ai::GeminiService;
use kroolo_api::AppState;
use tower::ServiceExt;

use crate::build_app;
use crate::config::Config;

fn test_config(cors_origin: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        api_key: "local-secret".to_string(),
        google_api_key: "google-secret".to_string(),
        port: 3000,
        gemini_model: "gemini-2.5-pro".to_string(),
        gemini_api_base: "http://127.0.0.1:1".to_string(),
        cors_origin: cors_origin.to_string(),
    }
}

async fn test_state() -> AppState {
    let pool = kroolo_storage::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    let model = GeminiService::new("google-secret", "gemini-2.5-pro").unwrap();
    AppState::new(pool, Arc::new(model), "local-secret")
}

#[tokio::test]
async fn test_cors_preflight_skips_api_key_check() {
    let app = build_app(&test_config("http://localhost:5173"), test_state().await).unwrap();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/epics")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-api-key,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_api_routes_still_require_key() {
    let app = build_app(&test_config("http://localhost:5173"), test_state().await).unwrap();

    let request = Request::builder()
        .uri("/api/epics")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_cors_origin_is_rejected() {
    let result = build_app(&test_config("bad\norigin"), test_state().await);

    assert!(result.is_err());
}
