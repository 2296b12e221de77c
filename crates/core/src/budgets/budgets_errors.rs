use rust_decimal::Decimal;
use thiserror::Error;

/// Typed business failures for budget mutations.
///
/// These are expected conditions the caller must handle, not infrastructure
/// faults: the HTTP layer turns `InsufficientBalance` into an actionable 4xx
/// message and may retry the whole flow on `ContentionExceeded`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BudgetError {
    #[error("Requested amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    #[error("No budget account found for project '{0}'")]
    AccountNotFound(String),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Budget update for project '{project_id}' lost {attempts} compare-and-swap races, giving up")]
    ContentionExceeded { project_id: String, attempts: u32 },
}
