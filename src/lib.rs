//! Music selections server
//!
//! Stores music selections in the `music_selections` bind database and
//! searches them, alongside the show catalog in the primary database.

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Databases;
use crate::error::ApiError;
use crate::services::search_cache::SearchCache;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub db: Databases,
    pub search_cache: SearchCache,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, db: Databases, search_cache: SearchCache) -> Self {
        Self {
            config,
            db,
            search_cache,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Music selections
        .route(
            "/add_music_selection",
            post(routes::music_selections::add_music_selection),
        )
        .route("/search", get(routes::music_selections::search))
        .route(
            "/music_selections/:id",
            get(routes::music_selections::get_music_selection)
                .delete(routes::music_selections::delete_music_selection),
        )
        // Shows
        .route(
            "/shows",
            get(routes::shows::list_shows).post(routes::shows::create_show),
        )
        .route("/shows/:id", get(routes::shows::get_show))
        .fallback(not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(timeout_envelope))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route")
}

/// The timeout layer answers with a bare 408; give it the error envelope
async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_gets_error_envelope() {
        let bare = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = timeout_envelope(bare).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Request timed out");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = timeout_envelope(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
