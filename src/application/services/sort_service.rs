// src/application/services/sort_service.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::collation::Collator;
use crate::domain::node::{BookmarkNode, MoveDestination};
use crate::domain::repositories::store::BookmarkStore;
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Folders first, then bookmarks, each group stably sorted by title.
///
/// Titles the collator calls equal keep their current relative order.
pub fn canonical_order(children: Vec<BookmarkNode>, collator: &dyn Collator) -> Vec<BookmarkNode> {
    let (mut folders, mut bookmarks): (Vec<_>, Vec<_>) =
        children.into_iter().partition(BookmarkNode::is_folder);
    folders.sort_by(|a, b| collator.compare(&a.title, &b.title));
    bookmarks.sort_by(|a, b| collator.compare(&a.title, &b.title));
    folders.extend(bookmarks);
    folders
}

/// Reorders every folder's children into canonical order with positional moves
#[derive(Debug)]
pub struct SortService {
    store: Arc<dyn BookmarkStore>,
    collator: Arc<dyn Collator>,
}

impl SortService {
    pub fn new(store: Arc<dyn BookmarkStore>, collator: Arc<dyn Collator>) -> Self {
        Self { store, collator }
    }

    /// Sorts the whole tree starting below the root's top-level containers.
    ///
    /// Returns the number of folders visited.
    #[instrument(skip(self), level = "debug")]
    pub async fn sort_all(&self) -> ApplicationResult<usize> {
        let tree = self.store.get_tree().await?;
        let Some(root) = tree.first() else {
            debug!("Empty tree, nothing to sort");
            return Ok(0);
        };
        let top_level: Vec<String> = root
            .child_nodes()
            .iter()
            .filter(|node| node.is_folder())
            .map(|node| node.id.clone())
            .collect();

        let visited = self.sort_subtrees(top_level).await?;
        debug!("Sorted {} folders", visited);
        Ok(visited)
    }

    /// Sorts the given folders and everything below them.
    ///
    /// Worklist instead of recursion: every round sorts the whole frontier
    /// concurrently, the subfolders it reports become the next frontier. A
    /// folder is only descended into after its own children were moved.
    pub async fn sort_subtrees(&self, folder_ids: Vec<String>) -> ApplicationResult<usize> {
        let mut frontier = folder_ids;
        let mut visited = 0;
        while !frontier.is_empty() {
            trace!("Sorting frontier of {} folders", frontier.len());
            let next = try_join_all(frontier.iter().map(|id| self.sort_children(id))).await?;
            visited += frontier.len();
            frontier = next.into_iter().flatten().collect();
        }
        Ok(visited)
    }

    /// Sorts the direct children of one folder.
    ///
    /// Returns the subfolders to descend into. Folders with fewer than two
    /// children are left alone and not descended into. Moves are issued even
    /// when the folder is already in order.
    #[instrument(skip(self), level = "trace")]
    pub async fn sort_children(&self, folder_id: &str) -> ApplicationResult<Vec<String>> {
        let children = self
            .store
            .get_children(folder_id)
            .await
            .map_err(|e| ApplicationError::from(e).context(format!("listing folder {}", folder_id)))?;
        if children.len() < 2 {
            return Ok(Vec::new());
        }

        let ordered = canonical_order(children, self.collator.as_ref());
        let moves = ordered.iter().enumerate().map(|(index, node)| {
            self.store
                .move_node(&node.id, MoveDestination::at(folder_id, index))
        });
        try_join_all(moves)
            .await
            .map_err(|e| ApplicationError::from(e).context(format!("sorting folder {}", folder_id)))?;

        Ok(ordered
            .into_iter()
            .filter(BookmarkNode::is_folder)
            .map(|node| node.id)
            .collect())
    }
}
