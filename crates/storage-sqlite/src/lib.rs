//! SQLite storage implementation for Pistosi.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `pistosi-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the budget domain
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!     storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod budgets;
pub mod closures;
pub mod history;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from pistosi-core for convenience
pub use pistosi_core::errors::{DatabaseError, Error, Result};
