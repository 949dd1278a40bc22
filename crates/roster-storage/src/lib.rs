//! # roster-storage
//!
//! Datastore adapters implementing `IRosterDatastore`: a DashMap-backed
//! in-memory store and a SQLite store with migrations.

pub mod engine;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod queries;

use std::sync::Arc;

use roster_core::config::{StorageBackend, StorageConfig};
use roster_core::errors::{DatastoreError, RosterError, RosterResult};
use roster_core::traits::SharedDatastore;

pub use engine::SqliteDatastore;
pub use memory::MemoryDatastore;

/// Map a rusqlite failure message into a datastore error.
pub(crate) fn to_storage_err(message: String) -> DatastoreError {
    DatastoreError::Query { message }
}

/// Build the datastore described by `config`. `StorageBackend::None` yields `None`.
pub fn open_datastore(config: &StorageConfig) -> RosterResult<Option<SharedDatastore>> {
    config.validate()?;
    let datastore: SharedDatastore = match config.backend {
        StorageBackend::None => return Ok(None),
        StorageBackend::Memory => Arc::new(MemoryDatastore::new()),
        StorageBackend::Sqlite => {
            let engine = match &config.path {
                Some(path) => SqliteDatastore::open(path),
                None => SqliteDatastore::open_in_memory(),
            }
            .map_err(|e| RosterError::datastore("open sqlite datastore", e))?;
            Arc::new(engine) as SharedDatastore
        }
    };
    tracing::info!(backend = ?config.backend, "roster datastore opened");
    Ok(Some(datastore))
}
