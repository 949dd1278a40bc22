//! Configuration for a roster collection and its datastore.
//!
//! # Examples
//!
//! ```
//! use roster_core::config::{RosterConfig, StorageBackend};
//!
//! let config = RosterConfig::from_toml_str(
//!     r#"
//!     auto_subscribe = false
//!
//!     [storage]
//!     backend = "memory"
//!     "#,
//! )
//! .unwrap();
//! assert!(config.auto_authorize);
//! assert!(!config.auto_subscribe);
//! assert_eq!(config.storage.backend, StorageBackend::Memory);
//! ```

mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTO_AUTHORIZE, DEFAULT_AUTO_SUBSCRIBE};
use crate::errors::{RosterError, RosterResult};

pub use storage_config::{StorageBackend, StorageConfig};

/// Top-level roster configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Default `auto_authorize` for nodes created on lookup. Default: true.
    pub auto_authorize: bool,
    /// Default `auto_subscribe` for nodes created on lookup. Default: true.
    pub auto_subscribe: bool,
    pub storage: StorageConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            auto_authorize: DEFAULT_AUTO_AUTHORIZE,
            auto_subscribe: DEFAULT_AUTO_SUBSCRIBE,
            storage: StorageConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> RosterResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| RosterError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> RosterResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RosterError::Config {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> RosterResult<()> {
        self.storage.validate()
    }
}
