//! Budgets module - account model, spend validation, and the mutation path.

mod budgets_errors;
mod budgets_model;
mod budgets_service;
mod budgets_traits;
mod budgets_validator;


pub use budgets_errors::BudgetError;
pub use budgets_model::{
    BalanceSnapshot, BudgetAccount, BudgetWarning, HistoryStatus, MutationOutcome,
    NewBudgetAccount, SpendRequest,
};
pub use budgets_service::BudgetMutationService;
pub use budgets_traits::{BudgetMutationServiceTrait, BudgetStoreTrait, SwapOutcome};
pub use budgets_validator::{assess_spend, SpendAssessment};
