// src/util/testing.rs

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::node::{BookmarkNode, MoveDestination};
use crate::domain::repositories::store::BookmarkStore;
use crate::infrastructure::stores::MemoryBookmarkStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

const ENV_VARS: [&str; 3] = ["BKORG_STORE_PATH", "BKORG_OPTIONS", "BKORG_INTERVAL"];

static TEST_ENV: OnceLock<()> = OnceLock::new();

/// Initializes the global test environment exactly once (logging)
pub fn init_test_env() {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
    });
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the `BKORG_*` environment on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    /// Saves the current values and clears them for the test
    pub fn new() -> Self {
        let saved = ENV_VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        for name in ENV_VARS {
            env::remove_var(name);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// Root "0" > "1" Bookmarks Bar holding `children`, plus an empty "2" Other Bookmarks
pub fn bar_tree(children: Vec<BookmarkNode>) -> Vec<BookmarkNode> {
    vec![BookmarkNode::folder(
        "0",
        "",
        vec![
            BookmarkNode::folder("1", "Bookmarks Bar", children),
            BookmarkNode::folder("2", "Other Bookmarks", vec![]),
        ],
    )]
}

/// Titles of the direct children of a folder in a snapshot, depth first lookup
pub fn child_titles(tree: &[BookmarkNode], folder_id: &str) -> Vec<String> {
    let mut stack: Vec<&BookmarkNode> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id == folder_id {
            return node.child_nodes().iter().map(|c| c.title.clone()).collect();
        }
        stack.extend(node.child_nodes());
    }
    Vec::new()
}

/// Store wrapper that records every mutation and fails on demand.
///
/// With `with_yields(n)` every call first yields to the runtime `n` times, so
/// concurrent engine operations interleave the way they do against a remote
/// store. Calls of one fan-out still reach the inner store in issue order.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryBookmarkStore,
    yields: usize,
    failing_moves: Mutex<HashSet<String>>,
    failing_removals: Mutex<HashSet<String>>,
    fail_move_at: Mutex<Option<usize>>,
    move_count: AtomicUsize,
    moves: Mutex<Vec<(String, MoveDestination)>>,
    removals: Mutex<Vec<String>>,
}

impl FaultyStore {
    pub fn new(inner: MemoryBookmarkStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn from_tree(tree: &[BookmarkNode]) -> Self {
        Self::new(MemoryBookmarkStore::from_tree(tree).expect("valid test tree"))
    }

    /// Yield `n` times before every store call
    pub fn with_yields(mut self, n: usize) -> Self {
        self.yields = n;
        self
    }

    pub fn inner(&self) -> &MemoryBookmarkStore {
        &self.inner
    }

    async fn pause(&self) {
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
    }

    /// Every move of `id` is rejected
    pub fn fail_moves_of(&self, id: &str) {
        self.failing_moves.lock().unwrap().insert(id.to_string());
    }

    /// Every removal of `id` is rejected
    pub fn fail_removals_of(&self, id: &str) {
        self.failing_removals.lock().unwrap().insert(id.to_string());
    }

    /// The n-th move call (0 based) is rejected
    pub fn fail_move_at(&self, n: usize) {
        *self.fail_move_at.lock().unwrap() = Some(n);
    }

    /// Successful moves in call order
    pub fn moves(&self) -> Vec<(String, MoveDestination)> {
        self.moves.lock().unwrap().clone()
    }

    /// Successful removals in call order
    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookmarkStore for FaultyStore {
    async fn get_tree(&self) -> StoreResult<Vec<BookmarkNode>> {
        self.pause().await;
        self.inner.get_tree().await
    }

    async fn get_children(&self, folder_id: &str) -> StoreResult<Vec<BookmarkNode>> {
        self.pause().await;
        self.inner.get_children(folder_id).await
    }

    async fn move_node(&self, node_id: &str, destination: MoveDestination) -> StoreResult<()> {
        self.pause().await;
        let call = self.move_count.fetch_add(1, Ordering::SeqCst);
        let injected = *self.fail_move_at.lock().unwrap() == Some(call);
        if injected || self.failing_moves.lock().unwrap().contains(node_id) {
            return Err(StoreError::Unavailable(format!(
                "injected failure moving {}",
                node_id
            )));
        }
        self.inner.move_node(node_id, destination.clone()).await?;
        self.moves
            .lock()
            .unwrap()
            .push((node_id.to_string(), destination));
        Ok(())
    }

    async fn remove(&self, node_id: &str) -> StoreResult<()> {
        self.pause().await;
        if self.failing_removals.lock().unwrap().contains(node_id) {
            return Err(StoreError::Unavailable(format!(
                "injected failure removing {}",
                node_id
            )));
        }
        self.inner.remove(node_id).await?;
        self.removals.lock().unwrap().push(node_id.to_string());
        Ok(())
    }
}
