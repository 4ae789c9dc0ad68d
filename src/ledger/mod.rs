//! Visited ledger and blacklist
//!
//! Two independent ways of excluding a URL from further work:
//!
//! - The [`PageLedger`] durably maps canonical URLs to their downloaded
//!   bodies; key presence is the authoritative "already processed" signal
//!   and survives restarts.
//! - The [`Blacklist`] is an in-memory set of URLs known to be malformed,
//!   out of scope, or failing; it lasts for one run. A restart re-derives
//!   the same verdicts if the links resurface.

use crate::storage::{Bucket, Store, StorageResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Durable store of URL -> fetched content
///
/// Written once per key in practice; the crawler never updates or deletes
/// an entry during a crawl.
pub struct PageLedger {
    store: Arc<dyn Store>,
}

impl PageLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persists a fetched page body under its canonical URL
    pub fn save_by_key(&self, url: &str, body: &[u8]) -> StorageResult<()> {
        self.store.put(Bucket::Pages, url, body)
    }

    /// Returns the stored body for a URL, or `None` if never visited
    pub fn get_by_key(&self, url: &str) -> StorageResult<Option<Vec<u8>>> {
        self.store.get(Bucket::Pages, url)
    }

    /// Fast existence check; the hot path of the dedup logic
    pub fn is_visited(&self, url: &str) -> bool {
        self.store.exists(Bucket::Pages, url).unwrap_or_else(|e| {
            tracing::error!("Visited check failed for {}: {}", url, e);
            false
        })
    }

    /// Number of pages visited so far
    pub fn size(&self) -> u64 {
        self.store.count(Bucket::Pages).unwrap_or_else(|e| {
            tracing::error!("Visited count failed: {}", e);
            0
        })
    }
}

/// In-memory set of URLs permanently excluded for the duration of a run
///
/// Every operation takes the lock only for the set mutation or lookup,
/// never across I/O. Cloning shares the underlying set.
#[derive(Clone, Default)]
pub struct Blacklist {
    urls: Arc<Mutex<HashSet<String>>>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, url: &str) {
        self.urls.lock().unwrap().insert(url.to_string());
    }

    pub fn remove(&self, url: &str) {
        self.urls.lock().unwrap().remove(url);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.lock().unwrap().contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn ledger() -> PageLedger {
        PageLedger::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    #[test]
    fn test_save_and_get() {
        let ledger = ledger();

        ledger
            .save_by_key("https://example.com/", b"<html>home</html>")
            .unwrap();

        let body = ledger.get_by_key("https://example.com/").unwrap();
        assert_eq!(body, Some(b"<html>home</html>".to_vec()));
    }

    #[test]
    fn test_is_visited() {
        let ledger = ledger();
        assert!(!ledger.is_visited("https://example.com/"));

        ledger.save_by_key("https://example.com/", b"body").unwrap();
        assert!(ledger.is_visited("https://example.com/"));
    }

    #[test]
    fn test_size() {
        let ledger = ledger();
        assert_eq!(ledger.size(), 0);

        ledger.save_by_key("https://example.com/a", b"a").unwrap();
        ledger.save_by_key("https://example.com/b", b"b").unwrap();
        assert_eq!(ledger.size(), 2);
    }

    #[test]
    fn test_blacklist_add_remove() {
        let blacklist = Blacklist::new();

        blacklist.add("https://other.com/");
        assert!(blacklist.contains("https://other.com/"));
        assert_eq!(blacklist.len(), 1);

        blacklist.remove("https://other.com/");
        assert!(!blacklist.contains("https://other.com/"));
        assert!(blacklist.is_empty());
    }

    #[test]
    fn test_blacklist_dedups() {
        let blacklist = Blacklist::new();

        blacklist.add("https://other.com/");
        blacklist.add("https://other.com/");
        assert_eq!(blacklist.len(), 1);
    }

    #[test]
    fn test_blacklist_clone_shares_state() {
        let blacklist = Blacklist::new();
        let view = blacklist.clone();

        blacklist.add("https://other.com/");
        assert!(view.contains("https://other.com/"));
    }
}
