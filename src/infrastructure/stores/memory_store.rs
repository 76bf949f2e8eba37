// src/infrastructure/stores/memory_store.rs
use crate::domain::error::{DomainError, DomainResult, StoreError, StoreResult};
use crate::domain::node::{BookmarkNode, MoveDestination, ROOT_ID};
use crate::domain::repositories::store::BookmarkStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone)]
struct Slot {
    title: String,
    url: Option<String>,
    parent: Option<String>,
    children: Vec<String>,
}

#[derive(Debug, Default)]
struct Arena {
    slots: HashMap<String, Slot>,
    roots: Vec<String>,
    next_id: u64,
}

impl Arena {
    fn slot(&self, id: &str) -> StoreResult<&Slot> {
        self.slots
            .get(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))
    }

    fn folder(&self, id: &str) -> StoreResult<&Slot> {
        let slot = self
            .slots
            .get(id)
            .ok_or_else(|| StoreError::ParentNotFound(id.to_string()))?;
        if slot.url.is_some() {
            return Err(StoreError::NotAFolder(id.to_string()));
        }
        Ok(slot)
    }

    fn allocate_id(&mut self) -> String {
        loop {
            let candidate = self.next_id.to_string();
            self.next_id += 1;
            if !self.slots.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn insert(&mut self, parent_id: &str, title: &str, url: Option<&str>) -> StoreResult<String> {
        self.folder(parent_id)?;
        let id = self.allocate_id();
        self.slots.insert(
            id.clone(),
            Slot {
                title: title.to_string(),
                url: url.map(str::to_string),
                parent: Some(parent_id.to_string()),
                children: Vec::new(),
            },
        );
        if let Some(parent) = self.slots.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        Ok(id)
    }

    /// Adds a snapshot node and its subtree, parents are taken from the nesting
    fn adopt(&mut self, node: &BookmarkNode, parent: Option<&str>) -> DomainResult<()> {
        if self.slots.contains_key(&node.id) {
            return Err(DomainError::InvalidTree(format!(
                "duplicate node id {}",
                node.id
            )));
        }
        if node.is_bookmark() && !node.child_nodes().is_empty() {
            return Err(DomainError::InvalidTree(format!(
                "bookmark {} has children",
                node.id
            )));
        }
        if let Ok(numeric) = node.id.parse::<u64>() {
            self.next_id = self.next_id.max(numeric + 1);
        }
        self.slots.insert(
            node.id.clone(),
            Slot {
                title: node.title.clone(),
                url: node.url.clone(),
                parent: parent.map(str::to_string),
                children: node.child_nodes().iter().map(|c| c.id.clone()).collect(),
            },
        );
        for child in node.child_nodes() {
            self.adopt(child, Some(&node.id))?;
        }
        Ok(())
    }

    fn shallow(&self, id: &str, index: Option<usize>) -> StoreResult<BookmarkNode> {
        let slot = self.slot(id)?;
        Ok(BookmarkNode {
            id: id.to_string(),
            title: slot.title.clone(),
            url: slot.url.clone(),
            parent_id: slot.parent.clone(),
            index,
            children: None,
        })
    }

    fn deep(&self, id: &str, index: Option<usize>) -> StoreResult<BookmarkNode> {
        let mut node = self.shallow(id, index)?;
        let slot = self.slot(id)?;
        if slot.url.is_none() {
            let children = slot
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| self.deep(child, Some(i)))
                .collect::<StoreResult<Vec<_>>>()?;
            node.children = Some(children);
        }
        Ok(node)
    }

    fn is_ancestor_or_self(&self, candidate: &str, of: &str) -> bool {
        let mut cursor = Some(of.to_string());
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.slots.get(&id).and_then(|s| s.parent.clone());
        }
        false
    }

    fn detach(&mut self, id: &str, parent: &str) {
        if let Some(parent) = self.slots.get_mut(parent) {
            parent.children.retain(|child| child != id);
        }
    }
}

/// In-process bookmark store with the host store's move and remove contract.
///
/// Moves are position exact: the node is detached first and then inserted at
/// `index` (clamped to the end of the new parent), so issuing the moves of a
/// folder's target order converges on that order. Root level nodes are
/// immutable and non-empty folders cannot be removed.
#[derive(Debug)]
pub struct MemoryBookmarkStore {
    arena: Mutex<Arena>,
}

impl Default for MemoryBookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBookmarkStore {
    /// Empty store with just the synthetic root
    pub fn new() -> Self {
        let mut arena = Arena {
            next_id: 1,
            ..Arena::default()
        };
        arena.slots.insert(
            ROOT_ID.to_string(),
            Slot {
                title: String::new(),
                url: None,
                parent: None,
                children: Vec::new(),
            },
        );
        arena.roots.push(ROOT_ID.to_string());
        Self {
            arena: Mutex::new(arena),
        }
    }

    /// Root with the usual fixed top-level containers: "1" Bookmarks Bar, "2" Other Bookmarks
    pub fn with_default_roots() -> Self {
        let store = Self::new();
        if let Ok(mut arena) = store.arena.lock() {
            let _ = arena.insert(ROOT_ID, "Bookmarks Bar", None);
            let _ = arena.insert(ROOT_ID, "Other Bookmarks", None);
        }
        store
    }

    /// Builds a store from a tree snapshot, e.g. the output of `get_tree`
    #[instrument(skip(tree), level = "debug")]
    pub fn from_tree(tree: &[BookmarkNode]) -> DomainResult<Self> {
        let mut arena = Arena {
            next_id: 1,
            ..Arena::default()
        };
        for node in tree {
            arena.adopt(node, None)?;
            arena.roots.push(node.id.clone());
        }
        debug!("Loaded {} nodes", arena.slots.len());
        Ok(Self {
            arena: Mutex::new(arena),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Arena>> {
        self.arena
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("store lock poisoned: {}", e)))
    }

    /// Current tree, same shape as `get_tree`
    pub fn snapshot(&self) -> StoreResult<Vec<BookmarkNode>> {
        let arena = self.lock()?;
        arena
            .roots
            .iter()
            .map(|root| arena.deep(root, None))
            .collect()
    }

    pub fn create_folder(&self, parent_id: &str, title: &str) -> StoreResult<String> {
        self.lock()?.insert(parent_id, title, None)
    }

    pub fn create_bookmark(&self, parent_id: &str, title: &str, url: &str) -> StoreResult<String> {
        self.lock()?.insert(parent_id, title, Some(url))
    }

    /// Node without its children, `None` when the id is unknown
    pub fn get(&self, id: &str) -> StoreResult<Option<BookmarkNode>> {
        let arena = self.lock()?;
        if !arena.slots.contains_key(id) {
            return Ok(None);
        }
        let index = arena
            .slot(id)?
            .parent
            .as_ref()
            .and_then(|p| arena.slots.get(p))
            .and_then(|p| p.children.iter().position(|c| c == id));
        arena.shallow(id, index).map(Some)
    }

    /// Number of nodes including the root(s)
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.slots.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarkStore {
    async fn get_tree(&self) -> StoreResult<Vec<BookmarkNode>> {
        self.snapshot()
    }

    async fn get_children(&self, folder_id: &str) -> StoreResult<Vec<BookmarkNode>> {
        let arena = self.lock()?;
        let slot = arena.slot(folder_id)?;
        if slot.url.is_some() {
            return Err(StoreError::NotAFolder(folder_id.to_string()));
        }
        slot.children
            .iter()
            .enumerate()
            .map(|(i, child)| arena.shallow(child, Some(i)))
            .collect()
    }

    async fn move_node(&self, node_id: &str, destination: MoveDestination) -> StoreResult<()> {
        let mut arena = self.lock()?;
        let old_parent = arena
            .slot(node_id)?
            .parent
            .clone()
            .ok_or(StoreError::RootImmutable)?;
        arena.folder(&destination.parent_id)?;
        if arena.is_ancestor_or_self(node_id, &destination.parent_id) {
            return Err(StoreError::CyclicMove {
                node: node_id.to_string(),
                parent: destination.parent_id,
            });
        }

        arena.detach(node_id, &old_parent);
        let parent = arena
            .slots
            .get_mut(&destination.parent_id)
            .ok_or_else(|| StoreError::ParentNotFound(destination.parent_id.clone()))?;
        match destination.index {
            Some(index) => {
                let index = index.min(parent.children.len());
                parent.children.insert(index, node_id.to_string());
            }
            None => parent.children.push(node_id.to_string()),
        }
        if let Some(node) = arena.slots.get_mut(node_id) {
            node.parent = Some(destination.parent_id.clone());
        }
        trace!(
            "Moved {} from {} to {} at {:?}",
            node_id,
            old_parent,
            destination.parent_id,
            destination.index
        );
        Ok(())
    }

    async fn remove(&self, node_id: &str) -> StoreResult<()> {
        let mut arena = self.lock()?;
        let slot = arena.slot(node_id)?;
        let parent = slot.parent.clone().ok_or(StoreError::RootImmutable)?;
        if !slot.children.is_empty() {
            return Err(StoreError::FolderNotEmpty(node_id.to_string()));
        }
        arena.detach(node_id, &parent);
        arena.slots.remove(node_id);
        trace!("Removed {}", node_id);
        Ok(())
    }
}
