// src/domain/mod.rs
pub mod collation;
pub mod error;
pub mod flatten;
pub mod node;
pub mod reconciliation;
pub mod repositories;
