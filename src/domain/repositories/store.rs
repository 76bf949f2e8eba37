// src/domain/repositories/store.rs
use crate::domain::error::StoreResult;
use crate::domain::node::{BookmarkNode, MoveDestination};
use async_trait::async_trait;

/*
   Store Interface
   The engines never own bookmark data. Everything they know comes from the
   store, and every snapshot may already be stale when the next write is issued:

   get_tree:     full snapshot, a list of root level nodes (normally one root "0")
   get_children: ordered direct children of one folder, shallow
   move_node:    position exact: the node is detached and re-inserted at `index`
                 (clamped to the end), or appended when no index is given
   remove:       removes a bookmark or an empty folder
*/
/// Capability the reconciliation engines need from a hierarchical bookmark store
#[async_trait]
pub trait BookmarkStore: std::fmt::Debug + Send + Sync {
    /// Snapshot of the whole tree
    async fn get_tree(&self) -> StoreResult<Vec<BookmarkNode>>;

    /// Direct children of a folder, in store order
    async fn get_children(&self, folder_id: &str) -> StoreResult<Vec<BookmarkNode>>;

    /// Move a node under `destination.parent_id`
    async fn move_node(&self, node_id: &str, destination: MoveDestination) -> StoreResult<()>;

    /// Remove a bookmark or an empty folder
    async fn remove(&self, node_id: &str) -> StoreResult<()>;
}
