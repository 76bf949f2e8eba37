// src/domain/flatten.rs
//! Flat views over a tree snapshot.
//!
//! Both walks are depth-first, parent before children, children in the order
//! the store presented them. That order reflects the current store state, it
//! is not the canonical order.

use crate::domain::node::{BookmarkNode, FlatBookmark, FlatFolder};

/// Pre-order walk without recursion, so very deep trees cannot blow the stack.
fn walk<'a>(tree: &'a [BookmarkNode], mut visit: impl FnMut(&'a BookmarkNode)) {
    let mut stack: Vec<&BookmarkNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        visit(node);
        stack.extend(node.child_nodes().iter().rev());
    }
}

/// All bookmark leaves of the snapshot
pub fn flatten_bookmarks(tree: &[BookmarkNode]) -> Vec<FlatBookmark> {
    let mut bookmarks = Vec::new();
    walk(tree, |node| {
        if let Some(url) = &node.url {
            bookmarks.push(FlatBookmark {
                id: node.id.clone(),
                title: node.title.clone(),
                url: url.clone(),
                parent_id: node.parent_id.clone(),
            });
        }
    });
    bookmarks
}

/// All folders of the snapshot except the synthetic root
pub fn flatten_folders(tree: &[BookmarkNode]) -> Vec<FlatFolder> {
    let mut folders = Vec::new();
    walk(tree, |node| {
        if node.is_folder() && !node.is_root() {
            folders.push(FlatFolder {
                id: node.id.clone(),
                title: node.title.clone(),
                parent_id: node.parent_id.clone(),
            });
        }
    });
    folders
}
