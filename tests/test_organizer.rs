use bkorg::application::Organizer;
use bkorg::domain::collation::PrimaryCollator;
use bkorg::domain::flatten::flatten_bookmarks;
use bkorg::domain::node::BookmarkNode as N;
use bkorg::domain::reconciliation::OrganizeOptions;
use bkorg::domain::repositories::store::BookmarkStore;
use bkorg::infrastructure::stores::{JsonFileStore, MemoryBookmarkStore};
use bkorg::util::testing::{bar_tree, child_titles, init_test_env, FaultyStore};
use std::sync::Arc;

const SORT_AND_DEDUP: OrganizeOptions = OrganizeOptions {
    sort_bookmarks: true,
    merge_folders: false,
    remove_duplicates: true,
};

/// Bookmarks Bar/{B, A, FolderZ/{b2}, FolderA/{c2}}, b2 and c2 share a url
fn scenario_tree() -> Vec<N> {
    bar_tree(vec![
        N::bookmark("10", "B", "https://b.example"),
        N::bookmark("11", "A", "https://a.example"),
        N::folder(
            "12",
            "FolderZ",
            vec![N::bookmark("13", "b2", "https://shared.example")],
        ),
        N::folder(
            "14",
            "FolderA",
            vec![N::bookmark("15", "c2", "https://shared.example")],
        ),
    ])
}

#[tokio::test]
async fn given_sort_and_dedup_when_organizing_then_counts_and_order_match() {
    // Arrange
    init_test_env();
    let store = Arc::new(MemoryBookmarkStore::from_tree(&scenario_tree()).unwrap());
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));

    // Act
    let result = organizer.run_organization(&SORT_AND_DEDUP).await;

    // Assert
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.before, 4);
    assert_eq!(result.removed, 1);
    assert_eq!(result.after, 3);
    assert_eq!(result.merged_folders, 0);
    let tree = store.get_tree().await.unwrap();
    assert_eq!(
        child_titles(&tree, "1"),
        vec!["FolderA", "FolderZ", "A", "B"]
    );
    // FolderA comes first after the initial sort, so its c2 is the keeper
    assert!(store.get("15").unwrap().is_some());
    assert!(store.get("13").unwrap().is_none());
}

#[tokio::test]
async fn given_extra_bookmark_in_folder_when_organizing_then_it_is_counted_and_sorted() {
    let mut tree = scenario_tree();
    let store = {
        // FolderZ/{b2, a2}
        let bar = &mut tree[0].children.as_mut().unwrap()[0];
        let folder_z = &mut bar.children.as_mut().unwrap()[2];
        folder_z
            .children
            .as_mut()
            .unwrap()
            .push(N::bookmark("16", "a2", "https://a2.example"));
        Arc::new(MemoryBookmarkStore::from_tree(&tree).unwrap())
    };
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));

    let result = organizer.run_organization(&SORT_AND_DEDUP).await;

    assert!(result.success);
    assert_eq!((result.before, result.removed, result.after), (5, 1, 4));
    assert_eq!(child_titles(&store.get_tree().await.unwrap(), "12"), vec!["a2"]);
}

#[tokio::test]
async fn given_all_policies_when_organizing_then_merge_is_reported() {
    // Arrange: two "Work" folders, one duplicate url between them
    let store = Arc::new(
        MemoryBookmarkStore::from_tree(&bar_tree(vec![
            N::folder(
                "10",
                "Work",
                vec![N::bookmark("11", "Wiki", "https://wiki.example")],
            ),
            N::folder(
                "12",
                "Work",
                vec![
                    N::bookmark("13", "Wiki copy", "https://wiki.example"),
                    N::bookmark("14", "Board", "https://board.example"),
                ],
            ),
        ]))
        .unwrap(),
    );
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));
    let options = OrganizeOptions {
        sort_bookmarks: true,
        merge_folders: true,
        remove_duplicates: true,
    };

    // Act
    let result = organizer.run_organization(&options).await;

    // Assert
    assert!(result.success);
    assert_eq!(result.merged_folders, 1);
    assert_eq!((result.before, result.removed, result.after), (3, 1, 2));
    let tree = store.get_tree().await.unwrap();
    assert_eq!(child_titles(&tree, "1"), vec!["Work"]);
    // the bar has a single child, so the final sort does not descend into it
    assert_eq!(child_titles(&tree, "10"), vec!["Wiki", "Board"]);
}

#[tokio::test]
async fn given_sorting_disabled_when_organizing_then_order_is_untouched() {
    let store = Arc::new(FaultyStore::from_tree(&scenario_tree()));
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));
    let options = OrganizeOptions {
        sort_bookmarks: false,
        merge_folders: false,
        remove_duplicates: false,
    };

    let result = organizer.run_organization(&options).await;

    assert!(result.success);
    assert_eq!((result.before, result.removed, result.after), (4, 0, 4));
    assert!(store.moves().is_empty());
    assert_eq!(
        child_titles(&store.get_tree().await.unwrap(), "1"),
        vec!["B", "A", "FolderZ", "FolderA"]
    );
}

#[tokio::test]
async fn given_yielding_store_when_organizing_everything_then_counts_match() {
    // Arrange
    let store = Arc::new(FaultyStore::from_tree(&scenario_tree()).with_yields(2));
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));
    let options = OrganizeOptions {
        merge_folders: true,
        ..SORT_AND_DEDUP
    };

    // Act
    let result = organizer.run_organization(&options).await;

    // Assert
    assert!(result.success, "{:?}", result.error);
    assert_eq!((result.before, result.removed, result.after), (4, 1, 3));
    assert_eq!(result.merged_folders, 0);
    assert_eq!(
        child_titles(&store.get_tree().await.unwrap(), "1"),
        vec!["FolderA", "FolderZ", "A", "B"]
    );
}

#[tokio::test]
async fn given_rejected_move_when_organizing_then_failure_with_zero_counts() {
    // Arrange
    let store = Arc::new(FaultyStore::from_tree(&scenario_tree()));
    store.fail_move_at(0);
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));

    // Act
    let result = organizer.run_organization(&SORT_AND_DEDUP).await;

    // Assert
    assert!(!result.success);
    assert_eq!(
        (result.before, result.after, result.removed, result.merged_folders),
        (0, 0, 0, 0)
    );
    let message = result.error.unwrap();
    assert!(message.contains("injected failure"), "{}", message);
    assert!(store.removals().is_empty());
}

#[tokio::test]
async fn given_json_file_when_organizing_and_saving_then_file_holds_result() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookmarks.json");
    std::fs::write(&path, serde_json::to_string(&scenario_tree()).unwrap()).unwrap();
    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let organizer = Organizer::new(store.clone(), Arc::new(PrimaryCollator));

    // Act
    let result = organizer.run_organization(&SORT_AND_DEDUP).await;
    store.save().unwrap();

    // Assert
    assert!(result.success);
    let reopened = JsonFileStore::open(&path).unwrap();
    let tree = reopened.get_tree().await.unwrap();
    assert_eq!(flatten_bookmarks(&tree).len(), 3);
    assert_eq!(
        child_titles(&tree, "1"),
        vec!["FolderA", "FolderZ", "A", "B"]
    );
}
