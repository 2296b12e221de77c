//! Pistosi Core - Budget domain entities, services, and traits.
//!
//! This crate contains the budget consistency and history-tracking logic:
//! balance validation, the single mutation path, the append-only history
//! ledger contract, and the year-end closure job. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod budgets;
pub mod closures;
pub mod constants;
pub mod errors;
pub mod history;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
