use std::sync::Arc;

use crate::errors::DatastoreResult;
use crate::jid::Jid;
use crate::models::{EntryFilter, RosterItem};

/// A datastore shared between a collection and all of its nodes.
pub type SharedDatastore = Arc<dyn IRosterDatastore>;

/// Persistence contract for roster entries.
///
/// All identities passed in and returned are bare.
pub trait IRosterDatastore: Send + Sync {
    /// With `owner = None`: every owner identity that has at least one stored
    /// item matching `filter`. With `owner = Some(o)`: the contacts in `o`'s
    /// roster matching `filter`.
    fn entries(&self, owner: Option<&Jid>, filter: &EntryFilter) -> DatastoreResult<Vec<Jid>>;

    fn load(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<Option<RosterItem>>;

    /// Insert or replace `item` in `owner`'s roster.
    fn save(&self, owner: &Jid, item: &RosterItem) -> DatastoreResult<()>;

    /// Returns whether an item was removed.
    fn remove(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<bool>;
}
