// SPDX-License-Identifier: Apache-2.0

use crate::filters::NewEntryQueryRequest;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Connection;

/// Read-side schema. Timestamps are integer Unix microseconds so the window
/// predicate and the sort order are exact integer comparisons.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id     TEXT PRIMARY KEY,
    name   TEXT NOT NULL,
    ticker TEXT
);
CREATE TABLE IF NOT EXISTS drugs (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    generic_name     TEXT,
    status           TEXT NOT NULL,
    therapeutic_area TEXT NOT NULL,
    indication       TEXT,
    company_id       TEXT NOT NULL REFERENCES companies(id)
);
CREATE TABLE IF NOT EXISTS new_drug_entries (
    id              TEXT PRIMARY KEY,
    drug_id         TEXT NOT NULL REFERENCES drugs(id),
    entry_type      TEXT NOT NULL,
    entry_date      INTEGER NOT NULL,
    status          TEXT NOT NULL,
    description     TEXT,
    changes         TEXT,
    regulatory_info TEXT,
    market_impact   TEXT,
    created_at      INTEGER NOT NULL,
    updated_at      INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_new_drug_entries_entry_date
    ON new_drug_entries(entry_date DESC, created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_new_drug_entries_drug_id
    ON new_drug_entries(drug_id);
CREATE INDEX IF NOT EXISTS idx_drugs_company_id
    ON drugs(company_id);
";

pub fn ensure_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

#[must_use]
pub fn timestamp_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

const ENTRY_PROJECTION: &str = "e.id, e.entry_type, e.entry_date, e.status, e.description, \
     e.changes, e.regulatory_info, e.market_impact, e.created_at, e.updated_at, \
     d.id, d.name, d.generic_name, d.status, d.therapeutic_area, d.indication, \
     c.id, c.name, c.ticker";

const ENTRY_JOINS: &str = "FROM new_drug_entries e \
     JOIN drugs d ON d.id = e.drug_id \
     JOIN companies c ON c.id = d.company_id";

fn window_predicate(req: &NewEntryQueryRequest, params: &mut Vec<Value>) -> &'static str {
    params.push(Value::Integer(timestamp_micros(req.window.from)));
    params.push(Value::Integer(timestamp_micros(req.window.to)));
    "e.entry_date >= ? AND e.entry_date <= ?"
}

/// Page fetch with enrichment joins. The ORDER BY is total (`id` as the last
/// key) so pagination across ties never duplicates or drops rows.
#[must_use]
pub fn build_page_sql(req: &NewEntryQueryRequest) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::new();
    let predicate = window_predicate(req, &mut params);
    let sql = format!(
        "SELECT {ENTRY_PROJECTION} {ENTRY_JOINS} WHERE {predicate} \
         ORDER BY e.entry_date DESC, e.created_at DESC, e.id DESC LIMIT ? OFFSET ?"
    );
    params.push(Value::Integer(i64::from(req.limit)));
    params.push(Value::Integer(req.offset()));
    (sql, params)
}

/// Window-scoped count, independent of pagination.
#[must_use]
pub fn build_count_sql(req: &NewEntryQueryRequest) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::new();
    let predicate = window_predicate(req, &mut params);
    (
        format!("SELECT COUNT(*) FROM new_drug_entries e WHERE {predicate}"),
        params,
    )
}

#[must_use]
pub fn build_entry_type_agg_sql(req: &NewEntryQueryRequest) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::new();
    let predicate = window_predicate(req, &mut params);
    (
        format!(
            "SELECT e.entry_type, COUNT(*) FROM new_drug_entries e \
             WHERE {predicate} GROUP BY e.entry_type"
        ),
        params,
    )
}

#[must_use]
pub fn build_status_agg_sql(req: &NewEntryQueryRequest) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::new();
    let predicate = window_predicate(req, &mut params);
    (
        format!(
            "SELECT e.status, COUNT(*) FROM new_drug_entries e \
             WHERE {predicate} GROUP BY e.status"
        ),
        params,
    )
}
