// SPDX-License-Identifier: Apache-2.0

use crate::company::CompanySummary;
use crate::ids::{CompanyId, DrugId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Drug development status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DrugStatus {
    Discovery,
    Preclinical,
    #[serde(rename = "phase_1")]
    Phase1,
    #[serde(rename = "phase_2")]
    Phase2,
    #[serde(rename = "phase_3")]
    Phase3,
    Approved,
    Withdrawn,
    Discontinued,
}

impl DrugStatus {
    pub const ALL: [Self; 8] = [
        Self::Discovery,
        Self::Preclinical,
        Self::Phase1,
        Self::Phase2,
        Self::Phase3,
        Self::Approved,
        Self::Withdrawn,
        Self::Discontinued,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Preclinical => "preclinical",
            Self::Phase1 => "phase_1",
            Self::Phase2 => "phase_2",
            Self::Phase3 => "phase_3",
            Self::Approved => "approved",
            Self::Withdrawn => "withdrawn",
            Self::Discontinued => "discontinued",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == input)
    }
}

impl Display for DrugStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full drug entity as owned by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub id: DrugId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    pub status: DrugStatus,
    pub therapeutic_area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
    pub company_id: CompanyId,
}

/// Drug shape attached to enriched new-entry rows, with the owning company
/// nested inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugSummary {
    pub id: DrugId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    pub status: DrugStatus,
    pub therapeutic_area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
    pub company: CompanySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in DrugStatus::ALL {
            assert_eq!(DrugStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DrugStatus::parse("phase_4"), None);
    }

    #[test]
    fn status_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&DrugStatus::Phase1).expect("serialize"),
            "\"phase_1\""
        );
        assert_eq!(
            serde_json::from_str::<DrugStatus>("\"approved\"").expect("deserialize"),
            DrugStatus::Approved
        );
    }
}
