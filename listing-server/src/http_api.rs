//! HTTP API for the product listing.

use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use listing_core::{ListingCriteria, ListingParams};
use listing_db::Store;
use serde::Serialize;

/// Header reporting the wall-clock time spent on the store round-trip.
pub const QUERY_TIME_HEADER: HeaderName = HeaderName::from_static("x-query-time");

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub query_timeout: Option<Duration>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/health", get(health))
        .with_state(state)
}

/// List products matching the query-string filters.
///
/// Malformed numeric filters are ignored rather than rejected; see
/// [`ListingCriteria::from_params`].
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Response {
    let criteria = ListingCriteria::from_params(&params);

    let start = Instant::now();
    let result = state.store.list_products(&criteria, state.query_timeout).await;
    let elapsed = start.elapsed();

    let mut response = match result {
        Ok(records) => {
            log::debug!("Listed {} product(s) in {:?}", records.len(), elapsed);
            (StatusCode::OK, Json(records)).into_response()
        }
        Err(e) => {
            log::error!("Query failed: {}", e);
            let body = ErrorResponse {
                error: e.to_string(),
                code: "QUERY_FAILED".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&format_query_time(elapsed)) {
        response.headers_mut().insert(QUERY_TIME_HEADER, value);
    }
    response
}

/// Render `elapsed` for the [`QUERY_TIME_HEADER`], e.g. `1.234ms` or `850us`.
///
/// Header values must be visible ASCII, so micros are spelled `us`.
pub fn format_query_time(elapsed: Duration) -> String {
    format!("{elapsed:?}").replace('µ', "u")
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
#[path = "tests/http_api_tests.rs"]
mod tests;
