mod model;
mod repository;

pub use model::{BudgetHistoryEntryDB, NewBudgetHistoryEntryDB};
pub use repository::HistoryRepository;
