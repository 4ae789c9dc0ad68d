//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the `Store` trait.
//! WAL journaling makes each statement atomic with respect to process
//! crashes, which is the durability guarantee the frontier and the visited
//! ledger build on.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Bucket, Store, StorageResult};
use crate::storage::StorageError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite storage backend
///
/// The connection sits behind a mutex so one `SqliteStore` can be shared
/// across worker tasks; SQLite serializes writers anyway, so the lock costs
/// nothing extra.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes both buckets
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for durability and concurrent readers
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Store for SqliteStore {
    fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            bucket.table()
        );
        conn.execute(&sql, params![key, value])?;
        Ok(())
    }

    fn get(&self, bucket: Bucket, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT value FROM {} WHERE key = ?1", bucket.table());
        let value = conn
            .query_row(&sql, params![key], |row| row.get::<_, Vec<u8>>(0))
            .optional()?;
        Ok(value)
    }

    fn delete(&self, bucket: Bucket, key: &str) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("DELETE FROM {} WHERE key = ?1", bucket.table());
        conn.execute(&sql, params![key])?;
        Ok(())
    }

    fn exists(&self, bucket: Bucket, key: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT 1 FROM {} WHERE key = ?1", bucket.table());
        let found = conn
            .query_row(&sql, params![key], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(found)
    }

    fn keys(&self, bucket: Bucket) -> StorageResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT key FROM {}", bucket.table());
        let mut stmt = conn.prepare(&sql)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn count(&self, bucket: Bucket) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM {}", bucket.table());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
