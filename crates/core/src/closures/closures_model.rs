//! Year-end closure domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::MutationOutcome;

/// Archived remainder of a closed year. Created once per
/// `(project_id, year)`, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearCloseRecord {
    pub id: String,
    pub project_id: String,
    pub year: i32,
    pub archived_amount: Decimal,
    pub closed_at: DateTime<Utc>,
}

/// Input model for archiving a year's remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewYearCloseRecord {
    pub project_id: String,
    pub year: i32,
    pub archived_amount: Decimal,
}

/// Result of closing one project's year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ClosureOutcome {
    /// Balance archived and zeroed.
    Closed {
        record: YearCloseRecord,
        mutation: MutationOutcome,
    },
    /// A close record for this year already exists; nothing was done.
    AlreadyClosed,
    /// The available balance was already zero; no record is written.
    NothingToArchive,
}

/// Tally of a full year-end sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClosureRunSummary {
    pub closed: usize,
    pub already_closed: usize,
    pub skipped: usize,
}
