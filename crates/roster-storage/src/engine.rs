//! SqliteDatastore: owns the connection, runs migrations on open, and
//! implements IRosterDatastore.

use std::path::Path;

use roster_core::errors::DatastoreResult;
use roster_core::models::{EntryFilter, RosterItem};
use roster_core::traits::IRosterDatastore;
use roster_core::Jid;

use crate::migrations;
use crate::pool::WriteConnection;
use crate::queries::roster_ops;

/// Roster persistence backed by SQLite.
pub struct SqliteDatastore {
    writer: WriteConnection,
}

impl SqliteDatastore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> DatastoreResult<Self> {
        let engine = Self {
            writer: WriteConnection::open(path)?,
        };
        engine.initialize()?;
        tracing::debug!(path = %path.display(), "sqlite roster datastore opened");
        Ok(engine)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DatastoreResult<Self> {
        let engine = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> DatastoreResult<()> {
        self.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Highest applied schema version.
    pub fn schema_version(&self) -> DatastoreResult<u32> {
        self.writer.with_conn_sync(migrations::current_version)
    }

    /// Connection access for maintenance and tests.
    pub fn writer(&self) -> &WriteConnection {
        &self.writer
    }
}

impl IRosterDatastore for SqliteDatastore {
    fn entries(&self, owner: Option<&Jid>, filter: &EntryFilter) -> DatastoreResult<Vec<Jid>> {
        self.writer.with_conn_sync(|conn| match owner {
            Some(owner) => roster_ops::list_contacts(conn, &owner.bare(), filter),
            None => roster_ops::list_owners(conn, filter),
        })
    }

    fn load(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<Option<RosterItem>> {
        self.writer
            .with_conn_sync(|conn| roster_ops::get_item(conn, &owner.bare(), &contact.bare()))
    }

    fn save(&self, owner: &Jid, item: &RosterItem) -> DatastoreResult<()> {
        self.writer
            .with_conn_sync(|conn| roster_ops::upsert_item(conn, &owner.bare(), item))
    }

    fn remove(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<bool> {
        self.writer
            .with_conn_sync(|conn| roster_ops::delete_item(conn, &owner.bare(), &contact.bare()))
    }
}
