// SPDX-License-Identifier: Apache-2.0

use crate::store::{EntryStore, StoreError};
use async_trait::async_trait;
use druginsight_query::{NewEntryQueryRequest, NewEntryQueryResponse};
use druginsight_model::NewDrugEntryRecord;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory store implementing the same window/sort/page semantics as the
/// SQLite backend, with failure and slow-read toggles for error-path tests.
#[derive(Default)]
pub struct FakeStore {
    pub entries: Mutex<Vec<NewDrugEntryRecord>>,
    pub unavailable: AtomicBool,
    pub slow_read: AtomicBool,
    pub slow_read_delay: Mutex<Duration>,
    pub fetch_calls: AtomicU64,
}

#[async_trait]
impl EntryStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("fake store offline".to_string()));
        }
        Ok(())
    }

    async fn fetch_new_entries(
        &self,
        req: NewEntryQueryRequest,
    ) -> Result<NewEntryQueryResponse, StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("fake store offline".to_string()));
        }
        if self.slow_read.load(Ordering::Relaxed) {
            let delay = *self.slow_read_delay.lock().await;
            tokio::time::sleep(delay).await;
        }
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);

        let mut matched: Vec<NewDrugEntryRecord> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| e.entry_date >= req.window.from && e.entry_date <= req.window.to)
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.entry_date
                .cmp(&a.entry_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });

        let total = matched.len() as u64;
        let mut by_entry_type = BTreeMap::new();
        let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
        for entry in &matched {
            *by_entry_type.entry(entry.entry_type).or_insert(0) += 1;
            *by_status.entry(entry.status.clone()).or_insert(0) += 1;
        }

        let skip = usize::try_from(req.offset().max(0)).unwrap_or(usize::MAX);
        let rows = matched
            .into_iter()
            .skip(skip)
            .take(req.limit as usize)
            .collect();
        Ok(NewEntryQueryResponse {
            rows,
            total,
            by_entry_type,
            by_status,
        })
    }
}
