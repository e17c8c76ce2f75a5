// SPDX-License-Identifier: Apache-2.0

use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;

use crate::db::{build_count_sql, build_entry_type_agg_sql, build_page_sql, build_status_agg_sql};
use crate::filters::{NewEntryQueryRequest, NewEntryQueryResponse};
use crate::row_decode::decode_entry_row;
use druginsight_model::NewDrugEntryType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    Sql(String),
    Decode(String),
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql(msg) | Self::Decode(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ExecError {}

fn sql_err(e: &rusqlite::Error) -> ExecError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(..) => ExecError::Decode(e.to_string()),
        _ => ExecError::Sql(e.to_string()),
    }
}

/// Runs the count, both window aggregates, and the page fetch against one
/// connection with the identical predicate. The reads are not wrapped in an
/// explicit transaction; a row committed between them is bounded staleness
/// the contract accepts.
pub fn execute_new_entries_query(
    conn: &Connection,
    req: &NewEntryQueryRequest,
) -> Result<NewEntryQueryResponse, ExecError> {
    let (count_sql, count_params) = build_count_sql(req);
    let total: i64 = conn
        .prepare_cached(&count_sql)
        .and_then(|mut stmt| {
            stmt.query_row(params_from_iter(count_params.iter()), |row| row.get(0))
        })
        .map_err(|e| sql_err(&e))?;

    let (type_sql, type_params) = build_entry_type_agg_sql(req);
    let mut by_entry_type: BTreeMap<NewDrugEntryType, u64> = BTreeMap::new();
    {
        let mut stmt = conn.prepare_cached(&type_sql).map_err(|e| sql_err(&e))?;
        let grouped = stmt
            .query_map(params_from_iter(type_params.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| sql_err(&e))?;
        for pair in grouped {
            let (raw, count) = pair.map_err(|e| sql_err(&e))?;
            let entry_type = NewDrugEntryType::parse(&raw)
                .ok_or_else(|| ExecError::Decode(format!("unknown entry type: {raw}")))?;
            by_entry_type.insert(entry_type, count.max(0) as u64);
        }
    }

    let (status_sql, status_params) = build_status_agg_sql(req);
    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    {
        let mut stmt = conn.prepare_cached(&status_sql).map_err(|e| sql_err(&e))?;
        let grouped = stmt
            .query_map(params_from_iter(status_params.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| sql_err(&e))?;
        for pair in grouped {
            let (status, count) = pair.map_err(|e| sql_err(&e))?;
            by_status.insert(status, count.max(0) as u64);
        }
    }

    let (page_sql, page_params) = build_page_sql(req);
    let mut stmt = conn.prepare_cached(&page_sql).map_err(|e| sql_err(&e))?;
    let mapped = stmt
        .query_map(params_from_iter(page_params.iter()), decode_entry_row)
        .map_err(|e| sql_err(&e))?;
    let rows = mapped
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| sql_err(&e))?;

    Ok(NewEntryQueryResponse {
        rows,
        total: total.max(0) as u64,
        by_entry_type,
        by_status,
    })
}
