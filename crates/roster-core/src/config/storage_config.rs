use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{RosterError, RosterResult};

/// Which datastore adapter to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// No datastore: nodes live only in memory and nothing is seeded.
    #[default]
    None,
    Memory,
    Sqlite,
}

/// Datastore configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file for the SQLite backend. `None` means in-memory.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> RosterResult<()> {
        if self.path.is_some() && self.backend != StorageBackend::Sqlite {
            return Err(RosterError::Config {
                reason: format!(
                    "storage.path is only valid for the sqlite backend, got {:?}",
                    self.backend
                ),
            });
        }
        Ok(())
    }
}
