use async_trait::async_trait;

use crate::budgets::budgets_model::{BalanceSnapshot, BudgetAccount, MutationOutcome, SpendRequest};
use crate::errors::Result;

/// Result of a conditional balance write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The stored values matched the expected pre-image and were replaced.
    Applied,
    /// The stored values changed since the read; the caller must re-fetch
    /// and re-validate.
    Conflict,
    /// No account row exists for the project.
    NotFound,
}

/// Trait for budget record store operations.
///
/// `compare_and_swap` is the single serialization point for balance writes:
/// the store must only apply `next` if the row still carries `expected`,
/// re-checked inside the write transaction.
#[async_trait]
pub trait BudgetStoreTrait: Send + Sync {
    fn fetch(&self, project_id: &str) -> Result<Option<BudgetAccount>>;

    async fn compare_and_swap(
        &self,
        project_id: &str,
        expected: BalanceSnapshot,
        next: BalanceSnapshot,
    ) -> Result<SwapOutcome>;

    /// All budget accounts, used by the year-end sweep.
    fn list(&self) -> Result<Vec<BudgetAccount>>;
}

/// Trait for the budget mutation service.
///
/// This service is the only writer of `available_balance` and
/// `annual_allocation`; no other code path may touch them.
#[async_trait]
pub trait BudgetMutationServiceTrait: Send + Sync {
    /// Deduct a document-creation spend: fetch, validate, compare-and-swap
    /// (bounded retries), then append the audit entry.
    async fn apply(&self, request: SpendRequest) -> Result<MutationOutcome>;

    /// Year-end write+log path: zero the available balance, leave the annual
    /// allocation untouched, and log a `YEAR_END_CLOSURE` entry.
    async fn apply_closure(&self, project_id: &str, year: i32) -> Result<MutationOutcome>;
}
