//! History module - the append-only budget mutation ledger.

mod history_model;
mod history_traits;

#[cfg(test)]
mod history_model_tests;

pub use history_model::{BudgetHistoryEntry, ChangeType, NewBudgetHistoryEntry};
pub use history_traits::HistoryLedgerTrait;
