mod model;
mod repository;

pub use model::{BudgetAccountDB, NewBudgetAccountDB};
pub use repository::BudgetRepository;
