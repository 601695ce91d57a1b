//! Notebook data model.
//!
//! # Responsibility
//! - Define user columns and their in-memory registry.
//! - Define note read models returned by the store.
//!
//! # Invariants
//! - `Column::storage_key` is always `codec::encode(display_name)`.
//! - Registry order is column definition order.

pub mod column;
pub mod note;
