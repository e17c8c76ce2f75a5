// SPDX-License-Identifier: Apache-2.0

use druginsight_api::{
    FiltersApplied, ListNewEntriesParams, ListNewEntriesResponse, NewEntriesSummary, PageMeta,
};
use druginsight_query::{EntryWindow, NewEntryQueryResponse};

/// Assembles the four-block success payload. `meta` is windowed by
/// pagination; `summary` only by the time filter.
pub(crate) fn build_success_payload(
    params: &ListNewEntriesParams,
    window: &EntryWindow,
    result: NewEntryQueryResponse,
) -> ListNewEntriesResponse {
    ListNewEntriesResponse {
        meta: PageMeta::for_page(params.page, params.limit, result.total),
        filters_applied: FiltersApplied {
            days_back: params.days_back,
            entry_date_from: window.from,
            entry_date_to: window.to,
        },
        summary: NewEntriesSummary {
            total_new_entries: result.total,
            by_entry_type: result.by_entry_type,
            by_status: result.by_status,
        },
        data: result.rows,
    }
}
