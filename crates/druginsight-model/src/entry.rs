// SPDX-License-Identifier: Apache-2.0

use crate::drug::DrugSummary;
use crate::ids::{DrugId, EntryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Kind of change a new-drug entry records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NewDrugEntryType {
    NewChemicalEntity,
    NewFormulation,
    NewRoute,
    NewDosage,
    NewGeneric,
    NewCombination,
    NewIndication,
}

impl NewDrugEntryType {
    pub const ALL: [Self; 7] = [
        Self::NewChemicalEntity,
        Self::NewFormulation,
        Self::NewRoute,
        Self::NewDosage,
        Self::NewGeneric,
        Self::NewCombination,
        Self::NewIndication,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewChemicalEntity => "new_chemical_entity",
            Self::NewFormulation => "new_formulation",
            Self::NewRoute => "new_route",
            Self::NewDosage => "new_dosage",
            Self::NewGeneric => "new_generic",
            Self::NewCombination => "new_combination",
            Self::NewIndication => "new_indication",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == input)
    }
}

impl Display for NewDrugEntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw new-drug entry row, before enrichment.
///
/// `status` is entry-specific free text (approved, pending,
/// investigational, ...), independent of the drug's lifecycle status.
/// The `changes`/`regulatory_info`/`market_impact` payloads vary by entry
/// type and pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrugEntry {
    pub id: EntryId,
    pub drug_id: DrugId,
    pub entry_type: NewDrugEntryType,
    pub entry_date: DateTime<Utc>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_impact: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New-drug entry enriched with its drug and that drug's company, as served
/// in `data` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrugEntryRecord {
    pub id: EntryId,
    pub drug: DrugSummary,
    pub entry_type: NewDrugEntryType,
    pub entry_date: DateTime<Utc>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_impact: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
