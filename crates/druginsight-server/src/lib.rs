// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

mod cache;
mod config;
mod http;
mod middleware;
mod store;

pub use config::ApiConfig;
pub use store::fake::FakeStore;
pub use store::sqlite::SqliteStore;
pub use store::{EntryStore, StoreError};

pub const CRATE_NAME: &str = "druginsight-server";

#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX));
    }

    pub async fn render_text(&self) -> String {
        let counts = self.counts.lock().await;
        let mut lines: Vec<String> = counts
            .iter()
            .map(|((route, status), count)| {
                format!("druginsight_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}")
            })
            .collect();
        drop(counts);
        let latency_map = self.latency_ns.lock().await;
        for (route, samples) in latency_map.iter() {
            if samples.is_empty() {
                continue;
            }
            let sum: u64 = samples.iter().copied().sum();
            lines.push(format!(
                "druginsight_request_latency_ns_sum{{route=\"{route}\"}} {sum}"
            ));
            lines.push(format!(
                "druginsight_request_latency_ns_count{{route=\"{route}\"}} {}",
                samples.len()
            ));
        }
        lines.sort();
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiConfig>,
    pub store: Arc<dyn EntryStore>,
    pub metrics: Arc<RequestMetrics>,
    pub(crate) hot_response_cache: Arc<Mutex<cache::hot::HotResponseCache>>,
}

impl AppState {
    #[must_use]
    pub fn new(api: ApiConfig, store: Arc<dyn EntryStore>) -> Self {
        let hot = cache::hot::HotResponseCache::new(
            api.response_cache_ttl,
            api.response_cache_max_entries,
        );
        Self {
            api: Arc::new(api),
            store,
            metrics: Arc::new(RequestMetrics::default()),
            hot_response_cache: Arc::new(Mutex::new(hot)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/version", get(http::handlers::version_handler))
        .route("/openapi.json", get(http::handlers::openapi_handler))
        .route("/drugs/new", get(http::handlers::new_entries_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
