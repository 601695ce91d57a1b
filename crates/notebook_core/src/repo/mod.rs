//! Notebook store contracts and persistence implementation.
//!
//! # Responsibility
//! - Define the operations the UI layer calls on one notebook.
//! - Keep SQL and identifier encoding behind the store boundary.
//!
//! # Invariants
//! - Format and schema failures are returned as typed errors, never replaced
//!   by default values.

pub mod notebook_repo;
