//! Database models for the budget history ledger.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use pistosi_core::errors::{Result, ValidationError};
use pistosi_core::history::{BudgetHistoryEntry, ChangeType, NewBudgetHistoryEntry};

use crate::utils::{format_timestamp, parse_amount, parse_timestamp};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetHistoryEntryDB {
    pub id: i64,
    pub project_id: String,
    pub previous_amount: String,
    pub new_amount: String,
    pub change_type: String,
    pub change_reason: String,
    pub document_id: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
}

impl BudgetHistoryEntryDB {
    pub fn into_domain(self) -> Result<BudgetHistoryEntry> {
        let change_type = ChangeType::from_str(&self.change_type).ok_or_else(|| {
            ValidationError::InvalidInput(format!("Unknown change type '{}'", self.change_type))
        })?;
        Ok(BudgetHistoryEntry {
            id: self.id,
            previous_amount: parse_amount(&self.previous_amount)?,
            new_amount: parse_amount(&self.new_amount)?,
            change_type,
            change_reason: self.change_reason,
            document_id: self.document_id,
            created_by: self.created_by,
            created_at: parse_timestamp(&self.created_at)?,
            project_id: self.project_id,
        })
    }
}

/// Insert model; the id column is left to SQLite's AUTOINCREMENT.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_history)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetHistoryEntryDB {
    pub project_id: String,
    pub previous_amount: String,
    pub new_amount: String,
    pub change_type: String,
    pub change_reason: String,
    pub document_id: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
}

impl From<NewBudgetHistoryEntry> for NewBudgetHistoryEntryDB {
    fn from(entry: NewBudgetHistoryEntry) -> Self {
        NewBudgetHistoryEntryDB {
            project_id: entry.project_id,
            previous_amount: entry.previous_amount.to_string(),
            new_amount: entry.new_amount.to_string(),
            change_type: entry.change_type.as_str().to_string(),
            change_reason: entry.change_reason,
            document_id: entry.document_id,
            created_by: entry.created_by,
            created_at: format_timestamp(entry.created_at.unwrap_or_else(Utc::now)),
        }
    }
}
