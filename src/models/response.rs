use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// 200 with no caching headers
    pub fn ok(data: T) -> Response {
        (StatusCode::OK, Json(Self::success(data))).into_response()
    }

    /// 201 for freshly stored records; never cached
    pub fn created(data: T) -> Response {
        (StatusCode::CREATED, Json(Self::success(data))).into_response()
    }

    /// 200 with shared-cache headers
    pub fn cached(data: T, max_age_secs: u64) -> Response {
        let mut response = Self::ok(data);
        if let Some(value) = cache_control(max_age_secs) {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
        response
    }
}

/// `public, s-maxage=N, stale-while-revalidate=2N`, or nothing when N is 0
pub fn cache_control(max_age_secs: u64) -> Option<HeaderValue> {
    if max_age_secs == 0 {
        return None;
    }
    HeaderValue::from_str(&format!(
        "public, s-maxage={}, stale-while-revalidate={}",
        max_age_secs,
        max_age_secs * 2
    ))
    .ok()
}
