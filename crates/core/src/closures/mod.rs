//! Closures module - year-end archival of remaining balances.

mod closures_model;
mod closures_service;
mod closures_traits;

#[cfg(test)]
mod closures_service_tests;

pub use closures_model::{ClosureOutcome, ClosureRunSummary, NewYearCloseRecord, YearCloseRecord};
pub use closures_service::YearEndClosureService;
pub use closures_traits::ClosureStoreTrait;
