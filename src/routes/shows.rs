//! Show catalog endpoints (primary database)

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

use super::admin::require_admin_key;
use crate::db::repository::{music_selections, shows};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, CreateShowRequest, MusicSelection, Page, Show, ShowDetail, ShowFilter,
    ShowListParams,
};
use crate::AppState;

/// GET /shows - Paginated show listing
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ShowListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let filter = ShowFilter::from_params(params, state.config.page_limits())?;

    let pool = &state.db.shows;
    let (rows, total) = tokio::try_join!(shows::list(pool, &filter), shows::count(pool, &filter))?;

    let page = Page {
        items: rows.into_iter().map(Show::from).collect::<Vec<_>>(),
        pagination: filter.pagination.info(total),
    };

    Ok(ApiResponse::cached(page, state.config.search_cache_ttl_seconds))
}

/// GET /shows/:id - A show and its music selections
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Response> {
    let Path(id) = id?;

    let show = shows::find_by_id(&state.db.shows, id)
        .await?
        .ok_or(ApiError::NotFound("Show"))?;

    let selections = music_selections::find_by_show(&state.db.music_selections, id).await?;

    Ok(ApiResponse::ok(ShowDetail {
        show: Show::from(show),
        music_selections: selections.into_iter().map(MusicSelection::from).collect(),
    }))
}

/// POST /shows - Create a show (admin)
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateShowRequest>, JsonRejection>,
) -> ApiResult<Response> {
    require_admin_key(&state, &headers)?;
    let Json(request) = payload?;
    let show = request.validate()?;

    let row = shows::insert(&state.db.shows, &show).await?;
    tracing::info!("Created show {} ({})", row.id, row.title);

    Ok(ApiResponse::created(Show::from(row)))
}
