// SPDX-License-Identifier: Apache-2.0

use crate::store::{EntryStore, StoreError};
use async_trait::async_trait;
use druginsight_query::{
    ensure_schema, execute_new_entries_query, ExecError, NewEntryQueryRequest,
    NewEntryQueryResponse,
};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};

/// SQLite-backed entry store with a bounded connection pool.
///
/// Queries run on the blocking pool; each request checks a connection out
/// (opening one lazily when the idle list is empty) and the semaphore bounds
/// total concurrency. The permit is released on every exit path.
pub struct SqliteStore {
    path: PathBuf,
    sql_timeout: Duration,
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
}

impl SqliteStore {
    pub fn open(
        path: impl Into<PathBuf>,
        max_connections: usize,
        sql_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            }
        }
        let conn = Connection::open(&path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        ensure_schema(&conn).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        drop(conn);
        Ok(Self {
            path,
            sql_timeout,
            idle: Mutex::new(Vec::new()),
            permits: Arc::new(Semaphore::new(max_connections.max(1))),
        })
    }

    fn open_read_connection(path: &Path) -> Result<Connection, StoreError> {
        Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl EntryStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::open_read_connection(&path)?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("ping task failed: {e}")))?
    }

    async fn fetch_new_entries(
        &self,
        req: NewEntryQueryRequest,
    ) -> Result<NewEntryQueryResponse, StoreError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| StoreError::Unavailable("connection pool closed".to_string()))?;
        let reused = self.idle.lock().await.pop();
        let path = self.path.clone();
        let sql_timeout = self.sql_timeout;

        let (conn, result) = tokio::task::spawn_blocking(move || {
            let conn = match reused {
                Some(conn) => conn,
                None => Self::open_read_connection(&path)?,
            };
            let deadline = Instant::now() + sql_timeout;
            conn.progress_handler(1_000, Some(move || Instant::now() > deadline));
            let result = execute_new_entries_query(&conn, &req);
            conn.progress_handler(1_000, None::<fn() -> bool>);
            Ok::<_, StoreError>((conn, result))
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("query task failed: {e}")))??;

        self.idle.lock().await.push(conn);
        result.map_err(|e| match e {
            ExecError::Decode(msg) => StoreError::Corrupt(msg),
            ExecError::Sql(msg) => StoreError::Unavailable(msg),
        })
    }
}
