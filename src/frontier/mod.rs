//! Persistent FIFO frontier queue
//!
//! The frontier holds URLs awaiting a fetch attempt, earliest-discovered
//! first. Every push and pull commits the durable write and the in-memory
//! mutation together, so a crash leaves no partial state. On a controlled
//! shutdown the exact ordering is checkpointed as a single blob; after an
//! unclean crash the pending set is rebuilt from the surviving per-item
//! keys, with ordering no longer guaranteed.

use crate::storage::{Bucket, Store, StorageError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Reserved key under which the ordering checkpoint blob is stored.
/// Frontier entries are always absolute URLs, so no entry can collide.
const ORDER_KEY: &str = "__order__";

/// Errors that can occur during frontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    /// The queue has no element to pull; callers back off and retry
    #[error("frontier is empty")]
    Empty,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Checkpoint serialization error: {0}")]
    Checkpoint(#[from] serde_json::Error),
}

/// Durable FIFO queue of URLs pending a crawl attempt
///
/// Callers must deduplicate before pushing; the frontier itself accepts
/// whatever it is given.
pub struct Frontier {
    store: Arc<dyn Store>,
    items: Mutex<VecDeque<String>>,
}

impl Frontier {
    /// Restores the frontier from durable storage
    ///
    /// If an ordering checkpoint exists (clean shutdown), the exact queue
    /// order is restored and the checkpoint is deleted so a later crash
    /// cannot resurrect it stale. Otherwise any per-item keys left behind by
    /// a crash are reloaded as an order-agnostic pending set.
    pub fn restore(store: Arc<dyn Store>) -> Result<Self, FrontierError> {
        let items = match store.get(Bucket::Frontier, ORDER_KEY)? {
            Some(blob) => {
                let order: Vec<String> = serde_json::from_slice(&blob)?;
                store.delete(Bucket::Frontier, ORDER_KEY)?;
                tracing::info!("Restored {} frontier items from checkpoint", order.len());
                VecDeque::from(order)
            }
            None => {
                let mut keys = store.keys(Bucket::Frontier)?;
                keys.retain(|k| k != ORDER_KEY);
                if !keys.is_empty() {
                    tracing::warn!(
                        "No checkpoint found; rebuilt {} frontier items without ordering",
                        keys.len()
                    );
                }
                VecDeque::from(keys)
            }
        };

        Ok(Self {
            store,
            items: Mutex::new(items),
        })
    }

    /// Appends a URL to the tail of the queue
    ///
    /// The durable write happens first; if it fails, the in-memory queue is
    /// left untouched and the error is returned.
    pub fn push(&self, url: &str) -> Result<(), FrontierError> {
        let mut items = self.items.lock().unwrap();
        self.store.put(Bucket::Frontier, url, &[])?;
        items.push_back(url.to_string());
        Ok(())
    }

    /// Removes and returns the head of the queue
    ///
    /// `Err(FrontierError::Empty)` is the normal "nothing ready" signal.
    /// The durable delete happens first; if it fails, the head stays queued.
    pub fn pull(&self) -> Result<String, FrontierError> {
        let mut items = self.items.lock().unwrap();
        let head = items.front().ok_or(FrontierError::Empty)?.clone();
        self.store.delete(Bucket::Frontier, &head)?;
        items.pop_front();
        Ok(head)
    }

    /// Number of URLs currently queued
    ///
    /// Zero at startup means there is no postponed work and the caller
    /// should seed the queue.
    pub fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    /// Checkpoints the current in-memory ordering as a single durable blob
    ///
    /// Called on controlled shutdown so a restart reconstructs the exact
    /// queue order.
    pub fn save_state(&self) -> Result<(), FrontierError> {
        let items = self.items.lock().unwrap();
        let order: Vec<&String> = items.iter().collect();
        let blob = serde_json::to_vec(&order)?;
        self.store.put(Bucket::Frontier, ORDER_KEY, &blob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SqliteStore, StorageResult};

    fn empty_frontier() -> (Arc<SqliteStore>, Frontier) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let frontier = Frontier::restore(store.clone()).unwrap();
        (store, frontier)
    }

    #[test]
    fn test_fifo_order() {
        let (_store, frontier) = empty_frontier();

        frontier.push("https://example.com/a").unwrap();
        frontier.push("https://example.com/b").unwrap();
        frontier.push("https://example.com/c").unwrap();

        assert_eq!(frontier.pull().unwrap(), "https://example.com/a");
        assert_eq!(frontier.pull().unwrap(), "https://example.com/b");
        assert_eq!(frontier.pull().unwrap(), "https://example.com/c");
    }

    #[test]
    fn test_pull_empty() {
        let (_store, frontier) = empty_frontier();
        assert!(matches!(frontier.pull(), Err(FrontierError::Empty)));
    }

    #[test]
    fn test_size_tracks_push_and_pull() {
        let (_store, frontier) = empty_frontier();
        assert_eq!(frontier.size(), 0);

        frontier.push("https://example.com/a").unwrap();
        frontier.push("https://example.com/b").unwrap();
        assert_eq!(frontier.size(), 2);

        frontier.pull().unwrap();
        assert_eq!(frontier.size(), 1);
    }

    #[test]
    fn test_checkpoint_roundtrip_preserves_order() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());

        {
            let frontier = Frontier::restore(store.clone()).unwrap();
            frontier.push("https://example.com/a").unwrap();
            frontier.push("https://example.com/b").unwrap();
            frontier.push("https://example.com/c").unwrap();
            frontier.save_state().unwrap();
        }

        let restored = Frontier::restore(store).unwrap();
        assert_eq!(restored.size(), 3);
        assert_eq!(restored.pull().unwrap(), "https://example.com/a");
        assert_eq!(restored.pull().unwrap(), "https://example.com/b");
        assert_eq!(restored.pull().unwrap(), "https://example.com/c");
    }

    #[test]
    fn test_checkpoint_is_consumed_on_restore() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());

        {
            let frontier = Frontier::restore(store.clone()).unwrap();
            frontier.push("https://example.com/a").unwrap();
            frontier.save_state().unwrap();
        }

        let _restored = Frontier::restore(store.clone()).unwrap();
        assert_eq!(store.get(Bucket::Frontier, ORDER_KEY).unwrap(), None);
    }

    #[test]
    fn test_rebuild_without_checkpoint() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());

        {
            // Simulated crash: items pushed, no save_state
            let frontier = Frontier::restore(store.clone()).unwrap();
            frontier.push("https://example.com/a").unwrap();
            frontier.push("https://example.com/b").unwrap();
        }

        let restored = Frontier::restore(store).unwrap();
        assert_eq!(restored.size(), 2);

        let mut pending = vec![restored.pull().unwrap(), restored.pull().unwrap()];
        pending.sort();
        assert_eq!(
            pending,
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_pull_removes_durable_key() {
        let (store, frontier) = empty_frontier();

        frontier.push("https://example.com/a").unwrap();
        assert!(store.exists(Bucket::Frontier, "https://example.com/a").unwrap());

        frontier.pull().unwrap();
        assert!(!store.exists(Bucket::Frontier, "https://example.com/a").unwrap());
    }

    /// Store double whose writes always fail
    struct BrokenStore;

    impl Store for BrokenStore {
        fn put(&self, _: Bucket, _: &str, _: &[u8]) -> StorageResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
        fn get(&self, _: Bucket, _: &str) -> StorageResult<Option<Vec<u8>>> {
            Ok(None)
        }
        fn delete(&self, _: Bucket, _: &str) -> StorageResult<()> {
            Ok(())
        }
        fn exists(&self, _: Bucket, _: &str) -> StorageResult<bool> {
            Ok(false)
        }
        fn keys(&self, _: Bucket) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn count(&self, _: Bucket) -> StorageResult<u64> {
            Ok(0)
        }
    }

    #[test]
    fn test_failed_push_leaves_memory_untouched() {
        let frontier = Frontier::restore(Arc::new(BrokenStore)).unwrap();

        assert!(frontier.push("https://example.com/a").is_err());
        assert_eq!(frontier.size(), 0);
    }
}
