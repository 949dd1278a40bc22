//! Single serialized connection shared by all roster nodes.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use roster_core::errors::{DatastoreError, DatastoreResult};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A mutex-guarded SQLite connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> DatastoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| DatastoreError::Unreachable {
            reason: format!("{}: {e}", path.display()),
        })?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> DatastoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> DatastoreResult<T>
    where
        F: FnOnce(&Connection) -> DatastoreResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| DatastoreError::Unreachable {
            reason: format!("connection lock poisoned: {e}"),
        })?;
        f(&guard)
    }
}
