// src/domain/reconciliation.rs
use serde::{Deserialize, Serialize};

/// Which policies a reconciliation pass applies. The phase order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeOptions {
    /// Sort folders before bookmarks, alphabetically (default: true)
    #[serde(default = "default_sort_bookmarks")]
    pub sort_bookmarks: bool,

    /// Unify folders with the same name (default: false)
    #[serde(default)]
    pub merge_folders: bool,

    /// Remove bookmarks with a repeated url or title (default: false)
    #[serde(default)]
    pub remove_duplicates: bool,
}

fn default_sort_bookmarks() -> bool {
    true
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            sort_bookmarks: default_sort_bookmarks(),
            merge_folders: false,
            remove_duplicates: false,
        }
    }
}

/// Outcome of one reconciliation pass.
///
/// On failure every counter is 0 and `error` holds the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub success: bool,
    #[serde(default)]
    pub before: usize,
    #[serde(default)]
    pub after: usize,
    #[serde(default)]
    pub removed: usize,
    #[serde(default)]
    pub merged_folders: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconciliationResult {
    pub fn succeeded(before: usize, after: usize, removed: usize, merged_folders: usize) -> Self {
        Self {
            success: true,
            before,
            after,
            removed,
            merged_folders,
            error: None,
        }
    }

    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            before: 0,
            after: 0,
            removed: 0,
            merged_folders: 0,
            error: Some(error.into()),
        }
    }

    /// Share of the initial bookmarks that were removed, in percent
    pub fn reduction_percent(&self) -> f64 {
        if self.before == 0 {
            return 0.0;
        }
        self.removed as f64 / self.before as f64 * 100.0
    }
}
