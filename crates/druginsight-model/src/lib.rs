#![forbid(unsafe_code)]
//! DrugInsight domain model SSOT.
//!
//! Entities are read-only from this service's perspective; ownership and
//! mutation belong to the upstream ingestion pipeline.

mod company;
mod drug;
mod entry;
mod ids;

pub use company::{Company, CompanySummary};
pub use drug::{Drug, DrugStatus, DrugSummary};
pub use entry::{NewDrugEntry, NewDrugEntryRecord, NewDrugEntryType};
pub use ids::{CompanyId, DrugId, EntryId, ParseError};

pub const CRATE_NAME: &str = "druginsight-model";
