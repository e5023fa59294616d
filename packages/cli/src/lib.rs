// ABOUTME: Server bootstrap for the Kroolo API
// ABOUTME: Tracing setup, database and model wiring, CORS and request tracing layers

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header::HeaderName, HeaderValue, Method};
use axum::Router;
use kroolo_ai::GeminiService;
use kroolo_api::{create_router, AppState, API_KEY_HEADER};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;

pub use config::{Config, ConfigError};

#[cfg(test)]
mod tests;

/// Log filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "kroolo=info,tower_http=info";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

/// Wrap the API router with CORS and per-request tracing
pub fn build_app(config: &Config, state: AppState) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ]);

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Connect the store, build the model client, and serve until shutdown
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = kroolo_storage::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let model = GeminiService::new(config.google_api_key.as_str(), config.gemini_model.as_str())
        .context("Failed to create Gemini client")?
        .with_api_base(config.gemini_api_base.as_str());
    info!("Using Gemini model: {}", model.model());

    let state = AppState::new(pool, Arc::new(model), config.api_key.as_str());
    let app = build_app(&config, state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
