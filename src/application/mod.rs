// src/application/mod.rs
pub mod error;
pub mod services;

pub use services::auto_organizer::AutoOrganizer;
pub use services::dedup_service::DeduplicationService;
pub use services::merge_service::FolderMergeService;
pub use services::organizer::Organizer;
pub use services::sort_service::SortService;
