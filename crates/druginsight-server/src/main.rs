// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use druginsight_server::{build_router, ApiConfig, AppState, EntryStore, SqliteStore};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("DRUGINSIGHT_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr =
        env::var("DRUGINSIGHT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path = env::var("DRUGINSIGHT_DB_PATH")
        .unwrap_or_else(|_| "artifacts/druginsight.sqlite".to_string());

    let api_cfg = ApiConfig {
        default_limit: env_u32("DRUGINSIGHT_DEFAULT_LIMIT", 20),
        max_limit: env_u32("DRUGINSIGHT_MAX_LIMIT", 100),
        default_days_back: env_u32("DRUGINSIGHT_DEFAULT_DAYS_BACK", 30),
        max_days_back: env_u32("DRUGINSIGHT_MAX_DAYS_BACK", 365),
        request_timeout: env_duration_ms("DRUGINSIGHT_REQUEST_TIMEOUT_MS", 5000),
        sql_timeout: env_duration_ms("DRUGINSIGHT_SQL_TIMEOUT_MS", 800),
        slow_query_threshold: env_duration_ms("DRUGINSIGHT_SLOW_QUERY_THRESHOLD_MS", 200),
        enable_response_cache: env_bool("DRUGINSIGHT_RESPONSE_CACHE", true),
        response_cache_ttl: env_duration_ms("DRUGINSIGHT_RESPONSE_CACHE_TTL_MS", 900_000),
        response_cache_max_entries: env_usize("DRUGINSIGHT_RESPONSE_CACHE_MAX_ENTRIES", 256),
        require_api_key: env_bool("DRUGINSIGHT_REQUIRE_API_KEY", false),
        allowed_api_keys: env_list("DRUGINSIGHT_API_KEYS"),
        max_connections: env_usize("DRUGINSIGHT_MAX_CONNECTIONS", 8),
    };

    let store = SqliteStore::open(&db_path, api_cfg.max_connections, api_cfg.sql_timeout)
        .map_err(|e| format!("failed to open store at {db_path}: {e}"))?;
    let store: Arc<dyn EntryStore> = Arc::new(store);

    let state = AppState::new(api_cfg, store);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    let local = listener
        .local_addr()
        .map_err(|e| format!("local_addr failed: {e}"))?;
    info!(addr = %local, db = %db_path, "druginsight-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server error: {e}"))?;
    Ok(())
}
