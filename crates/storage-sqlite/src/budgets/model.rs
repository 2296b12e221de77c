//! Database models for budget accounts.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use pistosi_core::budgets::BudgetAccount;
use pistosi_core::errors::Result;

use crate::utils::{parse_amount, parse_timestamp};

/// Database model for a budget account. Amounts are decimal TEXT written via
/// `Decimal::to_string`, which makes the compare-and-swap an exact text
/// comparison on the pre-image.
#[derive(
    Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(primary_key(project_id))]
#[diesel(table_name = crate::schema::budget_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetAccountDB {
    pub project_id: String,
    pub annual_allocation: String,
    pub available_balance: String,
    pub quarterly_allocation: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BudgetAccountDB {
    pub fn into_domain(self) -> Result<BudgetAccount> {
        Ok(BudgetAccount {
            annual_allocation: parse_amount(&self.annual_allocation)?,
            available_balance: parse_amount(&self.available_balance)?,
            quarterly_allocation: parse_amount(&self.quarterly_allocation)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            project_id: self.project_id,
        })
    }
}

/// Database model for provisioning a budget account.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_accounts)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetAccountDB {
    pub project_id: String,
    pub annual_allocation: String,
    pub available_balance: String,
    pub quarterly_allocation: String,
    pub created_at: String,
    pub updated_at: String,
}
