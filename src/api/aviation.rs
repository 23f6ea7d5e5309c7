//! Proxy endpoints under `/api/aviation`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::{Endpoint, Params, ProxyRequest};

pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// `GET /api/aviation/{endpoint}`
///
/// Forwards the query string upstream and returns the payload unchanged.
/// `?debug` forces a refresh when the server runs in debug mode.
pub async fn proxy_endpoint(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<Params>,
) -> Result<Response, ApiError> {
    let endpoint =
        Endpoint::from_slug(&slug).ok_or_else(|| ApiError::not_found("Endpoint", &slug))?;

    let request = ProxyRequest::from_caller(endpoint, params, state.config().general.debug);
    let response = state.aviation().fetch(&request).await?;

    Ok((
        [(
            CACHE_STATUS_HEADER,
            HeaderValue::from_static(response.cache.as_str()),
        )],
        Json(response.payload),
    )
        .into_response())
}

/// `GET /api/aviation/test`
///
/// Connectivity check against the upstream. Never cached and never echoes
/// the credential.
pub async fn test_connection(State(state): State<Arc<AppState>>) -> Response {
    let report = state.aviation().check_connectivity().await;
    let status = StatusCode::from_u16(report.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(report)).into_response()
}
