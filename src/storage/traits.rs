//! Storage trait and error types
//!
//! This module defines the contract the crawler expects from its durable
//! key-value collaborator. Two logical buckets exist: "pages" holds fetched
//! page bodies keyed by canonical URL, "frontier" holds pending work items.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Logical bucket within the store
///
/// Buckets map to separate tables so a key in one namespace can never
/// collide with a key in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Fetched page bodies, keyed by canonical URL
    Pages,
    /// Pending frontier items, keyed by URL
    Frontier,
}

impl Bucket {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Frontier => "frontier",
        }
    }
}

/// Trait for the durable key-value backend
///
/// Every mutating call must be atomic with respect to process crashes: a
/// crash mid-call leaves either the pre- or post-call state, never a corrupt
/// intermediate one. Implementations must be shareable across worker tasks.
pub trait Store: Send + Sync {
    /// Writes a value under a key, overwriting any previous value
    fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Reads the value stored under a key, or `None` if absent
    fn get(&self, bucket: Bucket, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Deletes a key; deleting an absent key is not an error
    fn delete(&self, bucket: Bucket, key: &str) -> StorageResult<()>;

    /// Fast existence check without reading the value
    fn exists(&self, bucket: Bucket, key: &str) -> StorageResult<bool>;

    /// Returns every key in a bucket (insertion order is not guaranteed)
    fn keys(&self, bucket: Bucket) -> StorageResult<Vec<String>>;

    /// Returns the number of keys in a bucket
    fn count(&self, bucket: Bucket) -> StorageResult<u64>;
}
