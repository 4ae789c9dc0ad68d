//! Database schema definitions
//!
//! This module contains the SQL schema for the Burrow database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Fetched page bodies, keyed by canonical URL
CREATE TABLE IF NOT EXISTS pages (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);

-- Pending frontier items, keyed by URL
CREATE TABLE IF NOT EXISTS frontier (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);
"#;

/// Initializes the database schema
///
/// Performed once at startup; safe to call on an already-initialized
/// database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
