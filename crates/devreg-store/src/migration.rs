//! Schema migrations for the SQLite world state.
//!
//! Migrations are an ordered table of `(version, sql)` steps. Every step
//! newer than the recorded version runs inside one transaction, and its
//! version is logged in `schema_migrations` with an RFC 3339 timestamp.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;

use crate::error::{LedgerError, LedgerResult};

/// Ordered schema steps. Versions are contiguous from 1.
const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    // TEXT keys use BINARY collation, so scans follow byte-wise key order.
    "CREATE TABLE world_state (
        key TEXT PRIMARY KEY NOT NULL,
        value BLOB NOT NULL
    );",
)];

/// Schema version a fully migrated database reports.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. A no-op when already current.
pub fn migrate(conn: &mut Connection) -> LedgerResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    let from = schema_version(conn)?;
    if from > CURRENT_VERSION {
        return Err(LedgerError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            from, CURRENT_VERSION
        )));
    }

    let pending = MIGRATIONS.iter().filter(|(version, _)| *version > from);
    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, Utc::now().to_rfc3339()],
        )?;
        info!(version, "applied world state migration");
    }
    tx.commit()?;

    Ok(())
}

/// The highest applied migration, or 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> LedgerResult<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
