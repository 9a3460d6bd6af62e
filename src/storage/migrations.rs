//! Schema migrations, tracked in `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 2;

const MIGRATIONS: &[&str] = &[
    // 1: locations and parts
    "CREATE TABLE IF NOT EXISTS locations (
        name TEXT PRIMARY KEY NOT NULL
     );
     CREATE TABLE IF NOT EXISTS parts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        location TEXT NOT NULL REFERENCES locations(name),
        description TEXT NOT NULL DEFAULT '',
        embedding BLOB
     );
     CREATE INDEX IF NOT EXISTS idx_parts_location ON parts(location);",
    // 2: remember which description an embedding was computed from
    "ALTER TABLE parts ADD COLUMN embedding_hash TEXT;",
];

/// Apply every pending migration and return the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!(target: "storage", version, "applied schema migration");
    }

    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}
