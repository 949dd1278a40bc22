//! # roster-core
//!
//! Foundation crate for the roster multiplexer.
//! Defines identities, models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod jid;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{RosterConfig, StorageBackend, StorageConfig};
pub use errors::{DatastoreError, DatastoreResult, RosterError, RosterResult};
pub use jid::{Jid, ToBareJid};
pub use models::{EntryFilter, PresenceResource, RosterItem, Subscription};
pub use traits::{IRosterDatastore, IRosterNode, SharedDatastore};
