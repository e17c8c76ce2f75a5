// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Absolute `[from, to]` interval a `days_back` filter resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Anchors `days_back` at the request instant. Pure; `days_back` is already
/// range-checked upstream, so there is no error case.
#[must_use]
pub fn resolve_entry_window(days_back: u32, now: DateTime<Utc>) -> EntryWindow {
    EntryWindow {
        from: now - Duration::days(i64::from(days_back)),
        to: now,
    }
}
