// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use druginsight_query::{NewEntryQueryRequest, NewEntryQueryResponse};
use std::fmt::{Display, Formatter};

pub mod fake;
pub mod sqlite;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage unreachable, saturated, or timed out; retriable upstream.
    Unavailable(String),
    /// Stored data failed to decode; an operator problem, not retriable.
    Corrupt(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) | Self::Corrupt(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read-side persistence seam. One call covers the page fetch and the
/// window totals so implementations keep both on the same predicate.
#[async_trait]
pub trait EntryStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn fetch_new_entries(
        &self,
        req: NewEntryQueryRequest,
    ) -> Result<NewEntryQueryResponse, StoreError>;
}
