use async_trait::async_trait;

use crate::errors::Result;
use crate::history::history_model::{BudgetHistoryEntry, NewBudgetHistoryEntry};

/// Trait for the append-only budget history ledger.
///
/// Deliberately exposes no update or delete operations: entries are
/// write-once.
#[async_trait]
pub trait HistoryLedgerTrait: Send + Sync {
    async fn append(&self, entry: NewBudgetHistoryEntry) -> Result<BudgetHistoryEntry>;

    /// Entries for a project, ordered by `created_at` descending with the
    /// surrogate id as tie-break. Sorting by id alone misorders backfilled
    /// entries whose creation order differs from insertion order.
    fn list(&self, project_id: &str) -> Result<Vec<BudgetHistoryEntry>>;
}
