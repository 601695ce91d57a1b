//! Notebook use-case services.
//!
//! # Responsibility
//! - Compose store calls into the flows the notebook window runs.
//! - Keep UI layers decoupled from storage details.

pub mod notebook_service;
