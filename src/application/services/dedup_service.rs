// src/application/services/dedup_service.rs
use crate::domain::collation::Collator;
use crate::domain::node::FlatBookmark;
use crate::domain::repositories::store::BookmarkStore;
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Bookmark ids flagged for removal, each id once, in the order they were flagged
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    ids: Vec<String>,
    members: HashSet<String>,
}

impl DuplicateSet {
    /// Returns false when the id was already flagged
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.members.insert(id.to_string()) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Flags every bookmark that repeats an earlier url or an earlier title key.
///
/// One left-to-right pass: the first bookmark seen for a url and the first
/// seen for a title key are keepers. A later bookmark matching either is
/// flagged, once. Urls are compared verbatim, titles through the collator's
/// title key (empty titles included).
pub fn find_duplicates(bookmarks: &[FlatBookmark], collator: &dyn Collator) -> DuplicateSet {
    let mut urls: HashSet<&str> = HashSet::new();
    let mut titles: HashSet<String> = HashSet::new();
    let mut duplicates = DuplicateSet::default();

    for bookmark in bookmarks {
        let repeated_url = !urls.insert(bookmark.url.as_str());
        let repeated_title = !titles.insert(collator.title_key(&bookmark.title));
        if repeated_url || repeated_title {
            duplicates.insert(&bookmark.id);
        }
    }
    duplicates
}

/// Removes duplicate bookmarks, best effort
#[derive(Debug)]
pub struct DeduplicationService {
    store: Arc<dyn BookmarkStore>,
    collator: Arc<dyn Collator>,
}

impl DeduplicationService {
    pub fn new(store: Arc<dyn BookmarkStore>, collator: Arc<dyn Collator>) -> Self {
        Self { store, collator }
    }

    pub fn find_duplicates(&self, bookmarks: &[FlatBookmark]) -> DuplicateSet {
        find_duplicates(bookmarks, self.collator.as_ref())
    }

    /// Issues one removal per flagged bookmark, all concurrently.
    ///
    /// A failed removal is logged and skipped. The returned count is the size
    /// of the flagged set, not the number of confirmed removals.
    #[instrument(skip(self, bookmarks), level = "debug", fields(bookmarks = bookmarks.len()))]
    pub async fn remove_duplicates(&self, bookmarks: &[FlatBookmark]) -> usize {
        let duplicates = self.find_duplicates(bookmarks);
        if duplicates.is_empty() {
            debug!("No duplicates found");
            return 0;
        }

        let removals = duplicates.ids().iter().map(|id| async move {
            match self.store.remove(id).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to remove duplicate bookmark {}: {}", id, e);
                    false
                }
            }
        });
        let failed = join_all(removals)
            .await
            .into_iter()
            .filter(|removed| !removed)
            .count();

        if failed > 0 {
            info!(
                "{} of {} duplicate removals failed",
                failed,
                duplicates.len()
            );
        }
        duplicates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collation::PrimaryCollator;

    fn bm(id: &str, title: &str, url: &str) -> FlatBookmark {
        FlatBookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            parent_id: Some("1".to_string()),
        }
    }

    #[test]
    fn given_repeated_url_when_finding_then_flags_later_occurrences() {
        let bookmarks = vec![
            bm("1", "Example", "https://example.com"),
            bm("2", "Other title", "https://example.com"),
            bm("3", "Third", "https://example.com"),
        ];

        let duplicates = find_duplicates(&bookmarks, &PrimaryCollator);

        assert_eq!(duplicates.ids(), &["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn given_url_differing_in_case_when_finding_then_not_duplicates() {
        let bookmarks = vec![
            bm("1", "One", "https://example.com/A"),
            bm("2", "Two", "https://example.com/a"),
        ];

        assert!(find_duplicates(&bookmarks, &PrimaryCollator).is_empty());
    }

    #[test]
    fn given_normalized_title_match_when_finding_then_flags_duplicate() {
        let bookmarks = vec![
            bm("1", "Hello, World!", "https://one.example"),
            bm("2", "hello world", "https://two.example"),
        ];

        let duplicates = find_duplicates(&bookmarks, &PrimaryCollator);

        assert_eq!(duplicates.ids(), &["2".to_string()]);
    }

    #[test]
    fn given_duplicate_under_both_keys_when_finding_then_counted_once() {
        let bookmarks = vec![
            bm("1", "Docs", "https://docs.example"),
            bm("2", "docs", "https://docs.example"),
        ];

        let duplicates = find_duplicates(&bookmarks, &PrimaryCollator);

        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates.ids(), &["2".to_string()]);
    }

    #[test]
    fn given_url_duplicate_with_new_title_when_finding_then_title_still_registered() {
        // "B" is flagged for its url, but its title becomes the keeper key for "b!"
        let bookmarks = vec![
            bm("1", "A", "https://same.example"),
            bm("2", "B", "https://same.example"),
            bm("3", "b!", "https://other.example"),
        ];

        let duplicates = find_duplicates(&bookmarks, &PrimaryCollator);

        assert_eq!(duplicates.ids(), &["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn given_empty_titles_when_finding_then_empty_string_is_a_key() {
        let bookmarks = vec![
            bm("1", "", "https://one.example"),
            bm("2", "", "https://two.example"),
        ];

        let duplicates = find_duplicates(&bookmarks, &PrimaryCollator);

        assert_eq!(duplicates.ids(), &["2".to_string()]);
    }

    #[test]
    fn given_empty_input_when_finding_then_nothing_flagged() {
        assert!(find_duplicates(&[], &PrimaryCollator).is_empty());
    }

    #[test]
    fn given_same_id_inserted_twice_when_inserting_then_second_is_rejected() {
        let mut set = DuplicateSet::default();
        assert!(set.insert("9"));
        assert!(!set.insert("9"));
        assert_eq!(set.len(), 1);
    }
}
