// src/infrastructure/mod.rs
pub mod di;
pub mod stores;
