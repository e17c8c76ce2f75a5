// SPDX-License-Identifier: Apache-2.0

use crate::window::EntryWindow;
use druginsight_model::{NewDrugEntryRecord, NewDrugEntryType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One validated read request: the resolved window plus the page slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntryQueryRequest {
    pub window: EntryWindow,
    pub page: u32,
    pub limit: u32,
}

impl NewEntryQueryRequest {
    /// Rows to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// Page rows plus the window-scoped totals the summary is built from.
///
/// `total`, `by_entry_type` and `by_status` cover the whole window, never
/// just the returned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntryQueryResponse {
    pub rows: Vec<NewDrugEntryRecord>,
    pub total: u64,
    pub by_entry_type: BTreeMap<NewDrugEntryType, u64>,
    pub by_status: BTreeMap<String, u64>,
}

impl NewEntryQueryResponse {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            by_entry_type: BTreeMap::new(),
            by_status: BTreeMap::new(),
        }
    }
}
