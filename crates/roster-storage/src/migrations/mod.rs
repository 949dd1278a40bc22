//! Versioned schema migrations, tracked in `schema_version`.

mod v001_roster_items;

use rusqlite::Connection;

use roster_core::constants::SCHEMA_VERSION;
use roster_core::errors::{DatastoreError, DatastoreResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> DatastoreResult<()>;

const MIGRATIONS: [(u32, Migration); 1] = [(1, v001_roster_items::migrate)];

/// Bring the schema up to `SCHEMA_VERSION`. Already-applied versions are skipped.
pub fn run_migrations(conn: &Connection) -> DatastoreResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        migrate(conn).map_err(|e| DatastoreError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::info!(version, "roster schema migration applied");
    }
    Ok(SCHEMA_VERSION)
}

/// Highest applied migration, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> DatastoreResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
