//! Storage module for the durable key-value backend
//!
//! This module houses the persistence substrate the frontier and the
//! visited ledger build on: a bucketed key-value contract (`Store`) and its
//! SQLite implementation. Nothing outside this module touches the database
//! directly.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{Bucket, Store, StorageError, StorageResult};

use std::path::Path;

/// Opens (or creates) the storage database at `path`
///
/// Both buckets are initialized as part of opening; this is the one-time
/// startup step the rest of the crate relies on.
pub fn open_store(path: &Path) -> Result<SqliteStore, StorageError> {
    SqliteStore::open(path)
}
