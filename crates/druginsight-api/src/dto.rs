// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use druginsight_model::{NewDrugEntryRecord, NewDrugEntryType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMeta {
    /// `pages = ceil(total / limit)`; an empty result set has zero pages, so
    /// page 1 of nothing reports neither neighbor.
    #[must_use]
    pub fn for_page(page: u32, limit: u32, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(limit));
        Self {
            page,
            limit,
            total,
            pages,
            has_next: u64::from(page) < pages,
            has_previous: page > 1,
        }
    }
}

/// The resolved entry window, echoed verbatim for client-side audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersApplied {
    pub days_back: u32,
    pub entry_date_from: DateTime<Utc>,
    pub entry_date_to: DateTime<Utc>,
}

/// Aggregates over the entire filtered window, independent of pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEntriesSummary {
    pub total_new_entries: u64,
    pub by_entry_type: BTreeMap<NewDrugEntryType, u64>,
    pub by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListNewEntriesResponse {
    pub data: Vec<NewDrugEntryRecord>,
    pub meta: PageMeta,
    pub filters_applied: FiltersApplied,
    pub summary: NewEntriesSummary,
}
