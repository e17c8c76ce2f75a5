// SPDX-License-Identifier: Apache-2.0

use crate::cache::hot::CachedResponse;
use crate::config::ApiConfig;
use crate::http::response::build_success_payload;
use crate::store::StoreError;
use crate::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use druginsight_api::{
    map_error, openapi_spec, parse_list_new_entries_params_with_bounds, ApiError, API_VERSION,
};
use druginsight_query::{resolve_entry_window, NewEntryQueryRequest};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

pub(crate) fn propagated_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("req-{}", Uuid::new_v4()))
}

fn api_error_response(error: ApiError) -> Response {
    let mapping = map_error(&error);
    let status =
        StatusCode::from_u16(mapping.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error)).into_response()
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

fn json_body_response(body: Vec<u8>, cache_tag: &'static str) -> Response {
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    response
        .headers_mut()
        .insert("content-type", HeaderValue::from_static("application/json"));
    response
        .headers_mut()
        .insert("x-druginsight-cache", HeaderValue::from_static(cache_tag));
    response
}

/// Boundary guard only; token verification happens upstream. With the guard
/// on, either a listed `x-api-key` or a non-empty bearer token is admitted.
fn authorize(api: &ApiConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    if !api.require_api_key {
        return Ok(());
    }
    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        if api.allowed_api_keys.iter().any(|allowed| allowed == key) {
            return Ok(());
        }
    }
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if auth
            .strip_prefix("Bearer ")
            .is_some_and(|token| !token.trim().is_empty())
        {
            return Ok(());
        }
    }
    Err(ApiError::authentication("missing or invalid credentials"))
}

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({"status": "ready", "store": state.store.backend_tag()}))
            .into_response(),
        Err(e) => {
            warn!(error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable", "store": state.store.backend_tag()})),
            )
                .into_response()
        }
    }
}

pub(crate) async fn version_handler() -> Response {
    Json(json!({
        "service": "druginsight-server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": API_VERSION,
    }))
    .into_response()
}

pub(crate) async fn openapi_handler() -> Response {
    Json(openapi_spec()).into_response()
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let mut response = state.metrics.render_text().await.into_response();
    response.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    response
}

pub(crate) async fn new_entries_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers);

    if let Err(e) = authorize(&state.api, &headers) {
        return with_request_id(
            api_error_response(e.with_request_id(request_id.clone())),
            &request_id,
        );
    }

    let parsed = match parse_list_new_entries_params_with_bounds(&params, state.api.param_bounds())
    {
        Ok(v) => v,
        Err(e) => {
            return with_request_id(
                api_error_response(e.with_request_id(request_id.clone())),
                &request_id,
            );
        }
    };

    let window = resolve_entry_window(parsed.days_back, Utc::now());
    let cache_key = format!(
        "days_back={}|page={}|limit={}",
        parsed.days_back, parsed.page, parsed.limit
    );

    if state.api.enable_response_cache {
        let mut cache = state.hot_response_cache.lock().await;
        if let Some(entry) = cache.get(&cache_key) {
            drop(cache);
            return with_request_id(json_body_response(entry.body, "hit"), &request_id);
        }
    }

    let query = NewEntryQueryRequest {
        window,
        page: parsed.page,
        limit: parsed.limit,
    };
    let result = tokio::time::timeout(
        state.api.request_timeout,
        state.store.fetch_new_entries(query),
    )
    .await;

    let payload = match result {
        Ok(Ok(found)) => {
            let query_elapsed = started.elapsed();
            if query_elapsed > state.api.slow_query_threshold {
                warn!(
                    request_id = %request_id,
                    days_back = parsed.days_back,
                    page = parsed.page,
                    limit = parsed.limit,
                    elapsed_ms = query_elapsed.as_millis() as u64,
                    "slow window query"
                );
            }
            info!(
                request_id = %request_id,
                total = found.total,
                rows = found.rows.len(),
                "new entries window served"
            );
            build_success_payload(&parsed, &window, found)
        }
        Ok(Err(err)) => {
            let error = match err {
                StoreError::Unavailable(msg) => {
                    error!(request_id = %request_id, error = %msg, "store unavailable");
                    ApiError::external_service("database", "storage unreachable")
                }
                StoreError::Corrupt(msg) => {
                    error!(request_id = %request_id, error = %msg, "stored row failed to decode");
                    ApiError::internal("stored data could not be decoded")
                }
            };
            return with_request_id(
                api_error_response(error.with_request_id(request_id.clone())),
                &request_id,
            );
        }
        Err(_) => {
            error!(request_id = %request_id, "store query exceeded request timeout");
            return with_request_id(
                api_error_response(
                    ApiError::external_service("database", "query timed out")
                        .with_request_id(request_id.clone()),
                ),
                &request_id,
            );
        }
    };

    let body = match serde_json::to_vec(&payload) {
        Ok(body) => body,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "payload serialization failed");
            return with_request_id(
                api_error_response(
                    ApiError::internal("response serialization failed")
                        .with_request_id(request_id.clone()),
                ),
                &request_id,
            );
        }
    };

    if state.api.enable_response_cache {
        state.hot_response_cache.lock().await.insert(
            cache_key,
            CachedResponse {
                body: body.clone(),
                created_at: Instant::now(),
            },
        );
    }

    with_request_id(json_body_response(body, "miss"), &request_id)
}
