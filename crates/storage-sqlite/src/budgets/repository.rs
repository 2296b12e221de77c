//! Budget account repository with true compare-and-swap.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use pistosi_core::budgets::{
    BalanceSnapshot, BudgetAccount, BudgetStoreTrait, NewBudgetAccount, SwapOutcome,
};
use pistosi_core::Result;

use super::model::{BudgetAccountDB, NewBudgetAccountDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budget_accounts;
use crate::utils::format_timestamp;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }

    /// Provision a budget account. Project provisioning lives outside the
    /// core; this is the insert it (and the tests) go through.
    pub async fn create_account(&self, account: NewBudgetAccount) -> Result<BudgetAccount> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetAccount> {
                let now = format_timestamp(Utc::now());
                let new_account = NewBudgetAccountDB {
                    project_id: account.project_id,
                    annual_allocation: account.annual_allocation.to_string(),
                    available_balance: account.available_balance.to_string(),
                    quarterly_allocation: account.quarterly_allocation.to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };

                let stored: BudgetAccountDB = diesel::insert_into(budget_accounts::table)
                    .values(&new_account)
                    .returning(BudgetAccountDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                stored.into_domain()
            })
            .await
    }
}

#[async_trait]
impl BudgetStoreTrait for BudgetRepository {
    fn fetch(&self, project_id: &str) -> Result<Option<BudgetAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = budget_accounts::table
            .find(project_id)
            .first::<BudgetAccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(BudgetAccountDB::into_domain).transpose()
    }

    async fn compare_and_swap(
        &self,
        project_id: &str,
        expected: BalanceSnapshot,
        next: BalanceSnapshot,
    ) -> Result<SwapOutcome> {
        let project_id_owned = project_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SwapOutcome> {
                // Conditional update keyed on the pre-image values. The write
                // actor runs this inside an immediate transaction, so the
                // guard and the write are atomic.
                let updated = diesel::update(
                    budget_accounts::table
                        .find(&project_id_owned)
                        .filter(
                            budget_accounts::available_balance
                                .eq(expected.available_balance.to_string()),
                        )
                        .filter(
                            budget_accounts::annual_allocation
                                .eq(expected.annual_allocation.to_string()),
                        ),
                )
                .set((
                    budget_accounts::available_balance.eq(next.available_balance.to_string()),
                    budget_accounts::annual_allocation.eq(next.annual_allocation.to_string()),
                    budget_accounts::updated_at.eq(format_timestamp(Utc::now())),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;

                if updated == 1 {
                    return Ok(SwapOutcome::Applied);
                }

                // Zero rows updated: distinguish a lost race from a missing
                // account.
                let exists = budget_accounts::table
                    .find(&project_id_owned)
                    .select(budget_accounts::project_id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .is_some();

                Ok(if exists {
                    SwapOutcome::Conflict
                } else {
                    SwapOutcome::NotFound
                })
            })
            .await
    }

    fn list(&self) -> Result<Vec<BudgetAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_accounts::table
            .order(budget_accounts::project_id.asc())
            .load::<BudgetAccountDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(BudgetAccountDB::into_domain).collect()
    }
}
