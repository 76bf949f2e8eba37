// src/application/services/mod.rs
pub mod auto_organizer;
pub mod dedup_service;
pub mod merge_service;
pub mod organizer;
pub mod sort_service;
