#![forbid(unsafe_code)]
//! Read pipeline for the new-drug-entries window: SQL building, execution,
//! and window aggregation over `rusqlite`.

mod db;
mod executor;
mod filters;
mod row_decode;
mod window;

pub use db::{ensure_schema, timestamp_micros, SCHEMA_SQL};
pub use executor::{execute_new_entries_query, ExecError};
pub use filters::{NewEntryQueryRequest, NewEntryQueryResponse};
pub use window::{resolve_entry_window, EntryWindow};

pub const CRATE_NAME: &str = "druginsight-query";
