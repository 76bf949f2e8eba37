// src/application/services/organizer.rs
use crate::application::error::ApplicationResult;
use crate::application::services::dedup_service::DeduplicationService;
use crate::application::services::merge_service::FolderMergeService;
use crate::application::services::sort_service::SortService;
use crate::domain::collation::Collator;
use crate::domain::flatten::flatten_bookmarks;
use crate::domain::reconciliation::{OrganizeOptions, ReconciliationResult};
use crate::domain::repositories::store::BookmarkStore;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Runs the enabled policies in their fixed order:
/// sort, count, dedup, merge, sort, count.
///
/// The second sort leaves the tree canonical after dedup and merge moved
/// things around. Counting happens on fresh snapshots.
#[derive(Debug)]
pub struct Organizer {
    store: Arc<dyn BookmarkStore>,
    sorter: SortService,
    deduplicator: DeduplicationService,
    merger: FolderMergeService,
}

impl Organizer {
    pub fn new(store: Arc<dyn BookmarkStore>, collator: Arc<dyn Collator>) -> Self {
        Self {
            sorter: SortService::new(store.clone(), collator.clone()),
            deduplicator: DeduplicationService::new(store.clone(), collator),
            merger: FolderMergeService::new(store.clone()),
            store,
        }
    }

    /// One reconciliation pass. Never returns an error: any failure becomes
    /// a result with `success == false` and the error message.
    #[instrument(skip(self), level = "debug")]
    pub async fn run_organization(&self, options: &OrganizeOptions) -> ReconciliationResult {
        match self.reconcile(options).await {
            Ok(result) => result,
            Err(e) => {
                error!("Organization failed: {}", e);
                ReconciliationResult::failed(e.to_string())
            }
        }
    }

    async fn reconcile(&self, options: &OrganizeOptions) -> ApplicationResult<ReconciliationResult> {
        info!(
            sort_bookmarks = options.sort_bookmarks,
            merge_folders = options.merge_folders,
            remove_duplicates = options.remove_duplicates,
            "Starting organization"
        );

        if options.sort_bookmarks {
            debug!("Initial sort");
            self.sorter.sort_all().await?;
        }

        let before = self.count_bookmarks().await?;

        let mut removed = 0;
        if options.remove_duplicates {
            let bookmarks = flatten_bookmarks(&self.store.get_tree().await?);
            removed = self.deduplicator.remove_duplicates(&bookmarks).await;
            info!("{} duplicate bookmarks removed", removed);
        }

        let mut merged_folders = 0;
        if options.merge_folders {
            merged_folders = self.merger.merge_duplicate_folders().await?;
            info!("{} folders merged", merged_folders);
        }

        if options.sort_bookmarks {
            debug!("Final sort");
            self.sorter.sort_all().await?;
        }

        let after = self.count_bookmarks().await?;
        info!(
            "Organization finished. Before: {}, removed: {}, after: {}",
            before, removed, after
        );
        Ok(ReconciliationResult::succeeded(
            before,
            after,
            removed,
            merged_folders,
        ))
    }

    /// Number of bookmark leaves in a fresh snapshot
    pub async fn count_bookmarks(&self) -> ApplicationResult<usize> {
        let tree = self.store.get_tree().await?;
        Ok(flatten_bookmarks(&tree).len())
    }
}
