// src/infrastructure/stores/json_file_store.rs
use crate::domain::error::{DomainError, DomainResult, StoreError, StoreResult};
use crate::domain::node::{BookmarkNode, MoveDestination};
use crate::domain::repositories::store::BookmarkStore;
use crate::infrastructure::stores::memory_store::MemoryBookmarkStore;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Bookmark tree persisted as a JSON file in `get_tree` shape.
///
/// The file is read once on `open`; all store operations run against the
/// in-memory copy until `save` writes it back.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryBookmarkStore,
}

impl JsonFileStore {
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> DomainResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DomainError::Store(StoreError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        })?;
        let tree: Vec<BookmarkNode> = serde_json::from_str(&content).map_err(|e| {
            DomainError::InvalidTree(format!(
                "{}: {}. Expected a JSON array of bookmark tree nodes.",
                path.display(),
                e
            ))
        })?;
        let inner = MemoryBookmarkStore::from_tree(&tree)?;
        debug!("Opened bookmark file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file atomically with the current tree
    #[instrument(skip(self), level = "debug", fields(path = %self.path.display()))]
    pub fn save(&self) -> StoreResult<()> {
        let tree = self.inner.snapshot()?;
        let json = serde_json::to_string_pretty(&tree)
            .map_err(|e| StoreError::Persistence(format!("Failed to serialize tree: {}", e)))?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| StoreError::Persistence(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| StoreError::Persistence(format!("Failed to write tree: {}", e)))?;
        tmp.persist(&self.path).map_err(|e| {
            StoreError::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!("Saved bookmark tree");
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for JsonFileStore {
    async fn get_tree(&self) -> StoreResult<Vec<BookmarkNode>> {
        self.inner.get_tree().await
    }

    async fn get_children(&self, folder_id: &str) -> StoreResult<Vec<BookmarkNode>> {
        self.inner.get_children(folder_id).await
    }

    async fn move_node(&self, node_id: &str, destination: MoveDestination) -> StoreResult<()> {
        self.inner.move_node(node_id, destination).await
    }

    async fn remove(&self, node_id: &str) -> StoreResult<()> {
        self.inner.remove(node_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TREE: &str = r#"[
      {"id": "0", "title": "", "children": [
        {"id": "1", "title": "Bookmarks Bar", "children": [
          {"id": "3", "title": "Rust", "url": "https://www.rust-lang.org/"}
        ]},
        {"id": "2", "title": "Other Bookmarks", "children": []}
      ]}
    ]"#;

    #[tokio::test]
    async fn given_json_file_when_opened_then_serves_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, TREE).unwrap();

        let store = JsonFileStore::open(&path).unwrap();

        let children = store.get_children("1").await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].url.as_deref(), Some("https://www.rust-lang.org/"));
        assert_eq!(children[0].parent_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn given_mutation_when_saved_then_reopened_file_reflects_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, TREE).unwrap();
        let store = JsonFileStore::open(&path).unwrap();

        store
            .move_node("3", MoveDestination::append("2"))
            .await
            .unwrap();
        store.save().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.get_children("1").await.unwrap().is_empty());
        assert_eq!(reopened.get_children("2").await.unwrap()[0].id, "3");
    }

    #[test]
    fn given_missing_file_when_opened_then_persistence_error() {
        let dir = tempdir().unwrap();

        let result = JsonFileStore::open(&dir.path().join("missing.json"));

        assert!(matches!(
            result,
            Err(DomainError::Store(StoreError::Persistence(_)))
        ));
    }

    #[test]
    fn given_malformed_json_when_opened_then_invalid_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, "{\"roots\": {}}").unwrap();

        let result = JsonFileStore::open(&path);

        assert!(matches!(result, Err(DomainError::InvalidTree(_))));
    }
}
