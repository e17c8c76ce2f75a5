use chrono::{Duration, Utc};
use druginsight_query::{ensure_schema, timestamp_micros};
use druginsight_server::{build_router, ApiConfig, AppState, EntryStore, FakeStore, SqliteStore};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

const COMPANY_ID: &str = "c0000000-0000-0000-0000-000000000001";
const DRUG_ID: &str = "d0000000-0000-0000-0000-000000000001";

/// Seeds one company, one drug, and `count` entries spaced a minute apart,
/// the newest one minute before now (plus `age`). `description` carries the
/// freshness rank (`entry-000` is the newest) so ordering is checkable from
/// the wire body.
fn seed_entries(db_path: &Path, count: usize, age: Duration) {
    let conn = Connection::open(db_path).expect("open sqlite");
    ensure_schema(&conn).expect("schema");
    conn.execute(
        "INSERT OR IGNORE INTO companies(id, name, ticker) VALUES (?1, ?2, ?3)",
        (COMPANY_ID, "Example Pharma", "EXPH"),
    )
    .expect("seed company");
    conn.execute(
        "INSERT OR IGNORE INTO drugs(id, name, generic_name, status, therapeutic_area, indication, company_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            DRUG_ID,
            "Examplinib",
            "examplinib",
            "phase_2",
            "oncology",
            "solid tumors",
            COMPANY_ID,
        ),
    )
    .expect("seed drug");

    let now = Utc::now();
    let mut stmt = conn
        .prepare(
            "INSERT INTO new_drug_entries(id, drug_id, entry_type, entry_date, status, description,
                 changes, regulatory_info, market_impact, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .expect("prepare entry insert");
    for i in 0..count {
        let entry_date = now - age - Duration::minutes(i as i64 + 1);
        let entry_type = if i % 2 == 0 {
            "new_chemical_entity"
        } else {
            "new_indication"
        };
        let status = if i % 3 == 0 { "approved" } else { "pending" };
        stmt.execute((
            Uuid::from_u128(0x1000 + i as u128).to_string(),
            DRUG_ID,
            entry_type,
            timestamp_micros(entry_date),
            status,
            format!("entry-{i:03}"),
            None::<String>,
            None::<String>,
            None::<String>,
            timestamp_micros(entry_date),
            timestamp_micros(entry_date),
        ))
        .expect("seed entry");
    }
}

async fn spawn_app(cfg: ApiConfig, store: Arc<dyn EntryStore>) -> std::net::SocketAddr {
    let app = build_router(AppState::new(cfg, store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn spawn_sqlite_app(db_path: &Path, cfg: ApiConfig) -> std::net::SocketAddr {
    let store = SqliteStore::open(db_path, cfg.max_connections, cfg.sql_timeout)
        .expect("open sqlite store");
    spawn_app(cfg, Arc::new(store)).await
}

async fn send_raw(
    addr: std::net::SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_ascii_lowercase(), body.to_string())
}

#[tokio::test]
async fn defaults_return_first_page_with_summary_and_request_id() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 5, Duration::zero());
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let (status, head, body) = send_raw(addr, "/drugs/new", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("x-request-id:"), "missing request id header");
    assert!(head.contains("x-druginsight-cache: miss"));

    let json: Value = serde_json::from_str(&body).expect("response json");
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["limit"], 20);
    assert_eq!(json["meta"]["total"], 5);
    assert_eq!(json["meta"]["pages"], 1);
    assert_eq!(json["meta"]["has_next"], false);
    assert_eq!(json["meta"]["has_previous"], false);
    assert_eq!(json["filters_applied"]["days_back"], 30);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["summary"]["total_new_entries"], 5);
    assert_eq!(json["summary"]["by_entry_type"]["new_chemical_entity"], 3);
    assert_eq!(json["summary"]["by_entry_type"]["new_indication"], 2);
    assert_eq!(json["summary"]["by_status"]["approved"], 2);
    assert_eq!(json["summary"]["by_status"]["pending"], 3);

    // Enrichment joins carry the drug and company blocks.
    let first = &json["data"][0];
    assert_eq!(first["description"], "entry-000");
    assert_eq!(first["drug"]["name"], "Examplinib");
    assert_eq!(first["drug"]["status"], "phase_2");
    assert_eq!(first["drug"]["company"]["name"], "Example Pharma");
    assert_eq!(first["drug"]["company"]["ticker"], "EXPH");
}

#[tokio::test]
async fn page_two_of_125_entries_returns_ranks_21_to_40() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 125, Duration::zero());
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let (status, _, body) = send_raw(addr, "/drugs/new?page=2&limit=20", &[]).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("response json");
    assert_eq!(json["meta"]["page"], 2);
    assert_eq!(json["meta"]["total"], 125);
    assert_eq!(json["meta"]["pages"], 7);
    assert_eq!(json["meta"]["has_next"], true);
    assert_eq!(json["meta"]["has_previous"], true);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 20);
    assert_eq!(data[0]["description"], "entry-020");
    assert_eq!(data[19]["description"], "entry-039");
    // Summary covers the whole window regardless of the requested page.
    assert_eq!(json["summary"]["total_new_entries"], 125);
}

#[tokio::test]
async fn out_of_window_entries_yield_an_empty_page_and_zero_summary() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 10, Duration::days(400));
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let (status, _, body) = send_raw(addr, "/drugs/new?days_back=365&limit=100", &[]).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("response json");
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["meta"]["total"], 0);
    assert_eq!(json["meta"]["pages"], 0);
    assert_eq!(json["meta"]["has_next"], false);
    assert_eq!(json["meta"]["has_previous"], false);
    assert_eq!(json["summary"]["total_new_entries"], 0);
    assert_eq!(json["filters_applied"]["days_back"], 365);
}

#[tokio::test]
async fn out_of_range_params_are_rejected_with_field_details() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 1, Duration::zero());
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let cases = [
        ("/drugs/new?days_back=366", "days_back", "must be <= 365"),
        ("/drugs/new?days_back=0", "days_back", "must be >= 1"),
        ("/drugs/new?limit=0", "limit", "must be >= 1"),
        ("/drugs/new?limit=101", "limit", "must be <= 100"),
        ("/drugs/new?page=0", "page", "must be >= 1"),
        ("/drugs/new?page=abc", "page", "must be an integer"),
    ];
    for (path, parameter, constraint) in cases {
        let (status, _, body) = send_raw(addr, path, &[]).await;
        assert_eq!(status, 422, "unexpected status for {path}");
        let json: Value = serde_json::from_str(&body).expect("error json");
        assert_eq!(json["error"], "VALIDATION_ERROR", "wrong code for {path}");
        assert_eq!(json["details"]["field_errors"][0]["parameter"], parameter);
        assert_eq!(json["details"]["field_errors"][0]["constraint"], constraint);
    }
}

#[tokio::test]
async fn caller_request_id_is_echoed_on_errors() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 1, Duration::zero());
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let (status, head, body) = send_raw(
        addr,
        "/drugs/new?limit=200",
        &[("x-request-id", "req-test-41")],
    )
    .await;
    assert_eq!(status, 422);
    assert!(head.contains("x-request-id: req-test-41"));
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["request_id"], "req-test-41");
}

#[tokio::test]
async fn api_key_guard_rejects_anonymous_and_admits_listed_keys() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 1, Duration::zero());
    let cfg = ApiConfig {
        require_api_key: true,
        allowed_api_keys: vec!["secret-key".to_string()],
        ..ApiConfig::default()
    };
    let addr = spawn_sqlite_app(&db, cfg).await;

    let (status, _, body) = send_raw(addr, "/drugs/new", &[]).await;
    assert_eq!(status, 401);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "AUTHENTICATION_ERROR");

    let (status, _, _) = send_raw(addr, "/drugs/new", &[("x-api-key", "wrong")]).await;
    assert_eq!(status, 401);

    let (status, _, _) = send_raw(addr, "/drugs/new", &[("x-api-key", "secret-key")]).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn bearer_token_is_admitted_alongside_the_allowlist() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 1, Duration::zero());
    let cfg = ApiConfig {
        require_api_key: true,
        allowed_api_keys: vec!["secret-key".to_string()],
        ..ApiConfig::default()
    };
    let addr = spawn_sqlite_app(&db, cfg).await;

    // Upstream-verified bearer token passes the guard even though an
    // x-api-key allowlist is also configured.
    let (status, _, _) = send_raw(
        addr,
        "/drugs/new",
        &[("authorization", "Bearer upstream-token")],
    )
    .await;
    assert_eq!(status, 200);

    let (status, _, _) = send_raw(addr, "/drugs/new", &[("authorization", "Bearer ")]).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn store_outage_maps_to_external_service_error() {
    let store = Arc::new(FakeStore::default());
    store.unavailable.store(true, Ordering::Relaxed);
    let addr = spawn_app(ApiConfig::default(), store).await;

    let (status, _, body) = send_raw(addr, "/drugs/new", &[]).await;
    assert_eq!(status, 502);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(json["details"]["service"], "database");
    assert!(json["request_id"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn slow_store_query_times_out_as_external_service_error() {
    let store = Arc::new(FakeStore::default());
    store.slow_read.store(true, Ordering::Relaxed);
    *store.slow_read_delay.lock().await = std::time::Duration::from_secs(5);
    let cfg = ApiConfig {
        request_timeout: std::time::Duration::from_millis(50),
        ..ApiConfig::default()
    };
    let addr = spawn_app(cfg, store).await;

    let (status, _, body) = send_raw(addr, "/drugs/new", &[]).await;
    assert_eq!(status, 502);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(json["message"], "query timed out");
    assert_eq!(json["details"]["service"], "database");
}

#[tokio::test]
async fn repeated_query_is_served_from_the_response_cache() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("entries.sqlite");
    seed_entries(&db, 3, Duration::zero());
    let addr = spawn_sqlite_app(&db, ApiConfig::default()).await;

    let (status, head, first_body) = send_raw(addr, "/drugs/new?days_back=7", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("x-druginsight-cache: miss"));

    let (status, head, second_body) = send_raw(addr, "/drugs/new?days_back=7", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("x-druginsight-cache: hit"));
    assert_eq!(first_body, second_body);

    // A different normalized key misses again.
    let (_, head, _) = send_raw(addr, "/drugs/new?days_back=7&page=2", &[]).await;
    assert!(head.contains("x-druginsight-cache: miss"));
}
