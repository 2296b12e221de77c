//! Year-end closure job.
//!
//! Archives each project's remaining available balance into a
//! `YearCloseRecord` and zeroes the working balance through the budget
//! mutation service's write+log path. Idempotent per `(project_id, year)`:
//! the existing-record check short-circuits re-runs, and the store's unique
//! index covers the race between two concurrent triggers (scheduled and
//! manual runs share this path).

use std::sync::Arc;

use log::{info, warn};
use rust_decimal::Decimal;

use crate::budgets::{BudgetError, BudgetMutationServiceTrait, BudgetStoreTrait};
use crate::closures::closures_model::{ClosureOutcome, ClosureRunSummary, NewYearCloseRecord};
use crate::closures::closures_traits::ClosureStoreTrait;
use crate::errors::{DatabaseError, Error, Result};

pub struct YearEndClosureService {
    closures: Arc<dyn ClosureStoreTrait>,
    mutations: Arc<dyn BudgetMutationServiceTrait>,
    accounts: Arc<dyn BudgetStoreTrait>,
}

impl YearEndClosureService {
    pub fn new(
        closures: Arc<dyn ClosureStoreTrait>,
        mutations: Arc<dyn BudgetMutationServiceTrait>,
        accounts: Arc<dyn BudgetStoreTrait>,
    ) -> Self {
        YearEndClosureService {
            closures,
            mutations,
            accounts,
        }
    }

    /// Close one project's year. Safe to call repeatedly.
    pub async fn close_project_year(&self, project_id: &str, year: i32) -> Result<ClosureOutcome> {
        if self.closures.find(project_id, year)?.is_some() {
            return Ok(ClosureOutcome::AlreadyClosed);
        }

        let account = match self.accounts.fetch(project_id)? {
            Some(account) => account,
            None => return Err(BudgetError::AccountNotFound(project_id.to_string()).into()),
        };

        if account.available_balance <= Decimal::ZERO {
            return Ok(ClosureOutcome::NothingToArchive);
        }

        let record = match self
            .closures
            .insert(NewYearCloseRecord {
                project_id: project_id.to_string(),
                year,
                archived_amount: account.available_balance,
            })
            .await
        {
            Ok(record) => record,
            // Another trigger won the insert between our check and now.
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                warn!(
                    "Concurrent year-end closure detected for project {} year {}",
                    project_id, year
                );
                return Ok(ClosureOutcome::AlreadyClosed);
            }
            Err(e) => return Err(e),
        };

        let mutation = self.mutations.apply_closure(project_id, year).await?;

        Ok(ClosureOutcome::Closed { record, mutation })
    }

    /// Sweep every account with a positive balance. Both the scheduled
    /// trigger and the manual admin trigger call this.
    pub async fn close_year(&self, year: i32) -> Result<ClosureRunSummary> {
        let accounts = self.accounts.list()?;
        info!(
            "Starting year-end closure for {} across {} accounts",
            year,
            accounts.len()
        );

        let mut summary = ClosureRunSummary::default();
        for account in accounts {
            if account.available_balance <= Decimal::ZERO {
                summary.skipped += 1;
                continue;
            }
            match self.close_project_year(&account.project_id, year).await? {
                ClosureOutcome::Closed { .. } => summary.closed += 1,
                ClosureOutcome::AlreadyClosed => summary.already_closed += 1,
                ClosureOutcome::NothingToArchive => summary.skipped += 1,
            }
        }

        info!(
            "Year-end closure {} done: {} closed, {} already closed, {} skipped",
            year, summary.closed, summary.already_closed, summary.skipped
        );
        Ok(summary)
    }
}
