//! Budget domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FUNDING_CHANNEL, REALLOCATION_CHANNEL};

/// Domain model for a project's budget account.
///
/// Both balances are monotonically non-increasing except on explicit
/// replenishment (out of scope here); `quarterly_allocation` is the reference
/// ceiling for the low-runway warning and is never written by this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAccount {
    pub project_id: String,
    pub annual_allocation: Decimal,
    pub available_balance: Decimal,
    pub quarterly_allocation: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl BudgetAccount {
    /// The pre-image pair used as the compare-and-swap guard.
    pub fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot {
            available_balance: self.available_balance,
            annual_allocation: self.annual_allocation,
        }
    }
}

/// Input model for provisioning a budget account. Provisioning itself is
/// driven by the project-setup flow outside this core; only the storage
/// layer's insert consumes this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetAccount {
    pub project_id: String,
    pub annual_allocation: Decimal,
    pub available_balance: Decimal,
    pub quarterly_allocation: Decimal,
}

/// An (available, annual) balance pair, used both as the CAS pre-image and
/// as the values to write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub available_balance: Decimal,
    pub annual_allocation: Decimal,
}

/// Soft warnings attached to an allowed mutation. Neither blocks the spend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetWarning {
    /// The annual allocation reaches zero with this spend; a separate
    /// funding action is required.
    AnnualDepletion,
    /// The remaining balance drops to 20% of the quarterly allocation or
    /// below.
    BelowReallocationThreshold,
}

impl BudgetWarning {
    /// Notification channel the caller is encouraged to raise for this
    /// warning.
    pub fn notification_channel(&self) -> &'static str {
        match self {
            BudgetWarning::AnnualDepletion => FUNDING_CHANNEL,
            BudgetWarning::BelowReallocationThreshold => REALLOCATION_CHANNEL,
        }
    }
}

/// Input for a document-creation spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendRequest {
    pub project_id: String,
    pub amount: Decimal,
    pub document_id: Option<String>,
    pub actor_id: Option<String>,
    /// Free-text reason recorded in the history entry. Defaults to a
    /// document-creation note when absent.
    pub reason: Option<String>,
}

/// Whether the audit entry for a committed mutation made it to the ledger.
///
/// The balance write is the financially authoritative event; a failed append
/// is surfaced here for manual reconciliation, never as a failure of the
/// mutation itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "status", content = "entryId")]
pub enum HistoryStatus {
    Recorded(i64),
    Failed,
}

/// Result of a committed budget mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub project_id: String,
    pub new_available: Decimal,
    pub new_annual: Decimal,
    pub warning: Option<BudgetWarning>,
    pub history: HistoryStatus,
}
