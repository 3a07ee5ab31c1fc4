//! Music selection endpoints, backed by the music_selections bind

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    response::Response,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::admin::require_admin_key;
use crate::db::repository::{music_selections, shows};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{self, CacheOutcome};
use crate::models::{
    AddMusicSelectionRequest, ApiResponse, MusicSelection, SearchFilter, SearchParams,
    SearchResults,
};
use crate::AppState;

/// POST /add_music_selection - Store a new music selection
pub async fn add_music_selection(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddMusicSelectionRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let selection = request.validate()?;

    // show_id lives in the primary database; no FK can enforce it
    if let Some(show_id) = selection.show_id {
        if !shows::exists(&state.db.shows, show_id).await? {
            return Err(ApiError::NotFound("Show"));
        }
    }

    let row = music_selections::insert(&state.db.music_selections, &selection).await?;

    state.search_cache.invalidate().await;
    metrics::record_selection_added();

    tracing::info!(
        "Stored music selection {} ({}) for show {:?}",
        row.id,
        row.title,
        row.show_id
    );

    Ok(ApiResponse::created(MusicSelection::from(row)))
}

/// GET /search - Search music selections
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let filter = SearchFilter::from_params(params, state.config.page_limits())?;
    let max_age = state.config.search_cache_ttl_seconds;

    let mut lookup = state.search_cache.get(&filter).await;
    if let Some(cached) = lookup.hit.take() {
        metrics::record_search(CacheOutcome::Hit);
        return Ok(ApiResponse::cached(cached, max_age));
    }

    let pool = &state.db.music_selections;
    let (rows, total) = tokio::try_join!(
        music_selections::search(pool, &filter),
        music_selections::count_search(pool, &filter),
    )?;

    let results = SearchResults {
        items: rows.into_iter().map(MusicSelection::from).collect(),
        pagination: filter.pagination.info(total),
        query: filter.term.clone(),
    };

    if lookup.generation.is_some() {
        state.search_cache.put(&lookup, &filter, &results).await;
        metrics::record_search(CacheOutcome::Miss);
    } else {
        metrics::record_search(CacheOutcome::Disabled);
    }

    tracing::debug!(
        "Search {:?} matched {} selections",
        filter.term,
        results.pagination.total
    );

    Ok(ApiResponse::cached(results, max_age))
}

/// GET /music_selections/:id - Fetch one selection
pub async fn get_music_selection(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Response> {
    let Path(id) = id?;

    let row = music_selections::find_by_id(&state.db.music_selections, id)
        .await?
        .ok_or(ApiError::NotFound("Music selection"))?;

    Ok(ApiResponse::ok(MusicSelection::from(row)))
}

/// DELETE /music_selections/:id - Remove a selection (admin)
pub async fn delete_music_selection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Response> {
    require_admin_key(&state, &headers)?;
    let Path(id) = id?;

    let deleted = music_selections::delete(&state.db.music_selections, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Music selection"));
    }

    state.search_cache.invalidate().await;
    tracing::info!("Deleted music selection {}", id);

    Ok(ApiResponse::ok(serde_json::json!({
        "id": id,
        "deleted": true
    })))
}
