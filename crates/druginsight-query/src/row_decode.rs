// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use druginsight_model::{
    CompanyId, CompanySummary, DrugId, DrugStatus, DrugSummary, EntryId, NewDrugEntryRecord,
    NewDrugEntryType,
};
use rusqlite::types::Type;
use rusqlite::Row;
use serde_json::Value;

fn decode_err(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn decode_timestamp(idx: usize, micros: i64) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| decode_err(idx, format!("timestamp out of range: {micros}")))
}

fn decode_json(idx: usize, raw: Option<String>) -> Result<Option<Value>, rusqlite::Error> {
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| decode_err(idx, format!("malformed JSON: {e}")))
    })
    .transpose()
}

/// Decodes one joined row in the `build_page_sql` column order.
pub fn decode_entry_row(row: &Row<'_>) -> Result<NewDrugEntryRecord, rusqlite::Error> {
    let id: String = row.get(0)?;
    let entry_type: String = row.get(1)?;
    let entry_date: i64 = row.get(2)?;
    let status: String = row.get(3)?;
    let description: Option<String> = row.get(4)?;
    let changes: Option<String> = row.get(5)?;
    let regulatory_info: Option<String> = row.get(6)?;
    let market_impact: Option<String> = row.get(7)?;
    let created_at: i64 = row.get(8)?;
    let updated_at: i64 = row.get(9)?;
    let drug_id: String = row.get(10)?;
    let drug_name: String = row.get(11)?;
    let generic_name: Option<String> = row.get(12)?;
    let drug_status: String = row.get(13)?;
    let therapeutic_area: String = row.get(14)?;
    let indication: Option<String> = row.get(15)?;
    let company_id: String = row.get(16)?;
    let company_name: String = row.get(17)?;
    let ticker: Option<String> = row.get(18)?;

    Ok(NewDrugEntryRecord {
        id: EntryId::parse(&id).map_err(|e| decode_err(0, e.to_string()))?,
        drug: DrugSummary {
            id: DrugId::parse(&drug_id).map_err(|e| decode_err(10, e.to_string()))?,
            name: drug_name,
            generic_name,
            status: DrugStatus::parse(&drug_status)
                .ok_or_else(|| decode_err(13, format!("unknown drug status: {drug_status}")))?,
            therapeutic_area,
            indication,
            company: CompanySummary {
                id: CompanyId::parse(&company_id).map_err(|e| decode_err(16, e.to_string()))?,
                name: company_name,
                ticker,
            },
        },
        entry_type: NewDrugEntryType::parse(&entry_type)
            .ok_or_else(|| decode_err(1, format!("unknown entry type: {entry_type}")))?,
        entry_date: decode_timestamp(2, entry_date)?,
        status,
        description,
        changes: decode_json(5, changes)?,
        regulatory_info: decode_json(6, regulatory_info)?,
        market_impact: decode_json(7, market_impact)?,
        created_at: decode_timestamp(8, created_at)?,
        updated_at: decode_timestamp(9, updated_at)?,
    })
}
