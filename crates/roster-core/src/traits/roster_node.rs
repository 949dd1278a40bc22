use std::sync::Arc;

use crate::errors::RosterResult;
use crate::jid::Jid;
use crate::traits::SharedDatastore;

/// Per-identity roster state, as seen by a roster collection.
///
/// The collection only ever constructs nodes, flips their two policy flags
/// right after construction, rebinds their datastore, and resets them.
pub trait IRosterNode: Send + Sync + Sized {
    /// The connection or component that owns the node.
    type Connection: ?Sized + Send + Sync;

    /// Bind a new node to `jid` (always bare).
    fn new(
        connection: Arc<Self::Connection>,
        jid: Jid,
        datastore: Option<SharedDatastore>,
    ) -> RosterResult<Self>;

    fn jid(&self) -> &Jid;

    /// Drop transient presence state. Identity and roster items survive.
    fn reset(&mut self);

    /// Rebind the node's datastore. `None` unbinds it.
    fn set_backend(&mut self, datastore: Option<SharedDatastore>) -> RosterResult<()>;

    fn auto_authorize(&self) -> bool;
    fn set_auto_authorize(&mut self, value: bool);

    fn auto_subscribe(&self) -> bool;
    fn set_auto_subscribe(&mut self, value: bool);
}
