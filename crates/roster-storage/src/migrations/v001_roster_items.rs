//! v001: roster_items.

use rusqlite::Connection;

use roster_core::errors::DatastoreResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> DatastoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS roster_items (
            owner        TEXT NOT NULL,
            jid          TEXT NOT NULL,
            name         TEXT,
            groups       TEXT NOT NULL DEFAULT '[]',
            subscription TEXT NOT NULL DEFAULT 'none',
            pending_in   INTEGER NOT NULL DEFAULT 0,
            pending_out  INTEGER NOT NULL DEFAULT 0,
            whitelisted  INTEGER NOT NULL DEFAULT 0,
            updated_at   TEXT NOT NULL,
            PRIMARY KEY (owner, jid)
        );

        CREATE INDEX IF NOT EXISTS idx_roster_owner ON roster_items(owner);
        CREATE INDEX IF NOT EXISTS idx_roster_subscription ON roster_items(subscription);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
