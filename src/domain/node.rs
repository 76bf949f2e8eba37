// src/domain/node.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the synthetic root node. It is a folder without parent and is never
/// sorted, merged or removed.
pub const ROOT_ID: &str = "0";

/// A node of the store's bookmark tree.
///
/// A node with a `url` is a bookmark, a node without one is a folder. Shallow
/// listings (children of a folder) carry `children: None` even for folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn folder<S: Into<String>>(id: S, title: S, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            parent_id: None,
            index: None,
            children: Some(children),
        }
    }

    pub fn bookmark<S: Into<String>>(id: S, title: S, url: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            parent_id: None,
            index: None,
            children: None,
        }
    }

    pub fn is_bookmark(&self) -> bool {
        self.url.is_some()
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Children of a folder snapshot, empty for bookmarks and shallow nodes
    pub fn child_nodes(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for BookmarkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "[{}] {} <{}>", self.id, self.title, url),
            None => write!(f, "[{}] {}/", self.id, self.title),
        }
    }
}

/// Projection of a bookmark leaf, derived from a fresh snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatBookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub parent_id: Option<String>,
}

/// Projection of a non-root folder, derived from a fresh snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatFolder {
    pub id: String,
    pub title: String,
    pub parent_id: Option<String>,
}

/// Target of a move command.
///
/// `index: None` appends to the end of the new parent's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDestination {
    pub parent_id: String,
    pub index: Option<usize>,
}

impl MoveDestination {
    pub fn at<S: Into<String>>(parent_id: S, index: usize) -> Self {
        Self {
            parent_id: parent_id.into(),
            index: Some(index),
        }
    }

    pub fn append<S: Into<String>>(parent_id: S) -> Self {
        Self {
            parent_id: parent_id.into(),
            index: None,
        }
    }
}
