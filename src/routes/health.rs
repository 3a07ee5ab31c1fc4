use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::db;
use crate::services::search_cache::CacheStatus;
use crate::AppState;

/// Root endpoint - basic status
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Music Selections Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Per-database connectivity
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseStatus {
    shows: bool,
    music_selections: bool,
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime: u64,
    databases: DatabaseStatus,
    search_cache: &'static str,
}

/// GET /health - Advanced health check
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    let (shows_ok, selections_ok, cache) = tokio::join!(
        db::health_check(&state.db.shows),
        db::health_check(&state.db.music_selections),
        state.search_cache.status(),
    );

    Json(HealthResponse {
        status: overall_status(shows_ok, selections_ok, cache != CacheStatus::Unreachable),
        uptime,
        databases: DatabaseStatus {
            shows: shows_ok,
            music_selections: selections_ok,
        },
        search_cache: cache.as_str(),
    })
}

/// Both databases are critical; the search cache is not
fn overall_status(shows_ok: bool, selections_ok: bool, cache_ok: bool) -> &'static str {
    match (shows_ok && selections_ok, cache_ok) {
        (true, true) => "ok",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    }
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Readiness probe
pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (shows_ok, selections_ok) = tokio::join!(
        db::health_check(&state.db.shows),
        db::health_check(&state.db.music_selections),
    );

    match (shows_ok, selections_ok) {
        (true, true) => (StatusCode::OK, "ready"),
        (false, true) => (StatusCode::SERVICE_UNAVAILABLE, "not ready - shows database unavailable"),
        (true, false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "not ready - music_selections database unavailable",
        ),
        (false, false) => (StatusCode::SERVICE_UNAVAILABLE, "not ready - databases unavailable"),
    }
}

/// Liveness probe
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
