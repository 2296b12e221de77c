//! History ledger domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What triggered a budget mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    DocumentCreation,
    YearEndClosure,
    ManualAdjustment,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::DocumentCreation => "DOCUMENT_CREATION",
            ChangeType::YearEndClosure => "YEAR_END_CLOSURE",
            ChangeType::ManualAdjustment => "MANUAL_ADJUSTMENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DOCUMENT_CREATION" => Some(ChangeType::DocumentCreation),
            "YEAR_END_CLOSURE" => Some(ChangeType::YearEndClosure),
            "MANUAL_ADJUSTMENT" => Some(ChangeType::ManualAdjustment),
            _ => None,
        }
    }
}

/// One committed budget mutation, immutable once written.
///
/// `document_id` is a soft reference: deleting the referenced document never
/// deletes or mutates the entry, so consumers must expect dangling ids and
/// render a placeholder instead of dereferencing them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetHistoryEntry {
    /// Monotonic surrogate key. Ordering tie-break only, never the primary
    /// sort key.
    pub id: i64,
    pub project_id: String,
    pub previous_amount: Decimal,
    pub new_amount: Decimal,
    pub change_type: ChangeType,
    pub change_reason: String,
    pub document_id: Option<String>,
    pub created_by: Option<String>,
    /// True mutation timestamp; the ledger's primary sort key.
    pub created_at: DateTime<Utc>,
}

/// Input model for appending a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetHistoryEntry {
    pub project_id: String,
    pub previous_amount: Decimal,
    pub new_amount: Decimal,
    pub change_type: ChangeType,
    pub change_reason: String,
    pub document_id: Option<String>,
    pub created_by: Option<String>,
    /// Mutation time. `None` means now; backfilled entries carry their true
    /// historical timestamp here.
    pub created_at: Option<DateTime<Utc>>,
}
