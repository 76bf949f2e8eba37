// src/application/services/merge_service.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::flatten::flatten_folders;
use crate::domain::node::{FlatFolder, MoveDestination};
use crate::domain::repositories::store::BookmarkStore;
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Folders sharing one trimmed name, in traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderGroup {
    pub name: String,
    pub folders: Vec<FlatFolder>,
}

impl FolderGroup {
    /// First folder in traversal order, the one that is kept
    pub fn survivor(&self) -> &FlatFolder {
        &self.folders[0]
    }

    /// Folders to drain into the survivor and remove
    pub fn sources(&self) -> &[FlatFolder] {
        &self.folders[1..]
    }

    pub fn is_redundant(&self) -> bool {
        self.folders.len() > 1
    }
}

/// Groups folders by title trimmed of surrounding whitespace.
///
/// The match is exact and case sensitive, location in the tree is ignored.
/// Groups come out in order of their first folder.
pub fn group_folders(folders: Vec<FlatFolder>) -> Vec<FolderGroup> {
    let mut groups: Vec<FolderGroup> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for folder in folders {
        let name = folder.title.trim().to_string();
        match by_name.get(&name) {
            Some(&slot) => groups[slot].folders.push(folder),
            None => {
                by_name.insert(name.clone(), groups.len());
                groups.push(FolderGroup {
                    name,
                    folders: vec![folder],
                });
            }
        }
    }
    groups
}

/// Unifies folders that share a name into the first one found
#[derive(Debug)]
pub struct FolderMergeService {
    store: Arc<dyn BookmarkStore>,
}

impl FolderMergeService {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Merges every group of same-named folders, returns how many folders were removed.
    ///
    /// Groups run one after the other: a source of one group may sit inside a
    /// source of another, and its removal must land before the outer source
    /// lists its children. Any failed move or removal aborts the run.
    #[instrument(skip(self), level = "debug")]
    pub async fn merge_duplicate_folders(&self) -> ApplicationResult<usize> {
        let tree = self.store.get_tree().await?;
        let groups: Vec<FolderGroup> = group_folders(flatten_folders(&tree))
            .into_iter()
            .filter(FolderGroup::is_redundant)
            .collect();
        if groups.is_empty() {
            debug!("No duplicate folder names");
            return Ok(0);
        }

        let mut merged = 0;
        for group in &groups {
            merged += self.merge_group(group).await?;
        }
        if merged > 0 {
            info!("{} folders merged", merged);
        }
        Ok(merged)
    }

    /// Drains the sources of one group one after the other
    async fn merge_group(&self, group: &FolderGroup) -> ApplicationResult<usize> {
        info!(
            "Found {} folders named {:?}, merging",
            group.folders.len(),
            group.name
        );
        let survivor = group.survivor();
        let mut merged = 0;
        for source in group.sources() {
            self.drain_into(source, survivor).await.map_err(|e| {
                e.context(format!(
                    "merging folder {} into {}",
                    source.id, survivor.id
                ))
            })?;
            merged += 1;
        }
        Ok(merged)
    }

    /// Moves all direct children of `source` under `survivor`, then removes `source`.
    ///
    /// The removal only happens after every move completed, a folder that
    /// still holds children is never removed.
    async fn drain_into(&self, source: &FlatFolder, survivor: &FlatFolder) -> ApplicationResult<()> {
        let children = self.store.get_children(&source.id).await?;
        let moves = children.iter().map(|child| {
            self.store
                .move_node(&child.id, MoveDestination::append(survivor.id.as_str()))
        });
        try_join_all(moves).await?;
        debug!(
            "Moved {} children of {} into {}",
            children.len(),
            source.id,
            survivor.id
        );

        self.store.remove(&source.id).await.map_err(ApplicationError::from)
    }
}
