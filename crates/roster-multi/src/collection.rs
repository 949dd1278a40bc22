//! RosterCollection: one roster node per bare identity, for one connection.

use std::collections::hash_map::{self, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use roster_core::config::RosterConfig;
use roster_core::constants::{DEFAULT_AUTO_AUTHORIZE, DEFAULT_AUTO_SUBSCRIBE};
use roster_core::errors::{RosterError, RosterResult};
use roster_core::models::EntryFilter;
use roster_core::traits::{IRosterNode, SharedDatastore};
use roster_core::{Jid, ToBareJid};

/// A node shared between the collection and whoever is handling its traffic.
pub type NodeHandle<N> = Arc<RwLock<N>>;

/// Read-lock a node. A poisoned lock still yields the node.
pub fn read_node<N>(handle: &NodeHandle<N>) -> RwLockReadGuard<'_, N> {
    handle.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-lock a node. A poisoned lock still yields the node.
pub fn write_node<N>(handle: &NodeHandle<N>) -> RwLockWriteGuard<'_, N> {
    handle.write().unwrap_or_else(PoisonError::into_inner)
}

/// Maps bare identities to roster nodes for a single connection.
///
/// Every identity-accepting method normalizes its input to the bare form, so
/// `"user@example.com/phone"` and `"user@example.com"` address the same node.
/// Nodes are never removed or replaced once created.
///
/// Mutating methods take `&mut self`; share a collection across threads by
/// wrapping the whole collection in one `Mutex`.
pub struct RosterCollection<N: IRosterNode> {
    connection: Arc<N::Connection>,
    datastore: Option<SharedDatastore>,
    auto_authorize: bool,
    auto_subscribe: bool,
    nodes: HashMap<Jid, NodeHandle<N>>,
}

impl<N: IRosterNode> RosterCollection<N> {
    /// Create a collection with both defaults enabled.
    ///
    /// With a datastore, every owner it reports is added eagerly. Those
    /// nodes keep their own flag defaults.
    pub fn new(
        connection: Arc<N::Connection>,
        datastore: Option<SharedDatastore>,
    ) -> RosterResult<Self> {
        Self::build(
            connection,
            datastore,
            DEFAULT_AUTO_AUTHORIZE,
            DEFAULT_AUTO_SUBSCRIBE,
        )
    }

    /// Like [`RosterCollection::new`], with defaults taken from `config`.
    pub fn with_config(
        connection: Arc<N::Connection>,
        datastore: Option<SharedDatastore>,
        config: &RosterConfig,
    ) -> RosterResult<Self> {
        Self::build(
            connection,
            datastore,
            config.auto_authorize,
            config.auto_subscribe,
        )
    }

    fn build(
        connection: Arc<N::Connection>,
        datastore: Option<SharedDatastore>,
        auto_authorize: bool,
        auto_subscribe: bool,
    ) -> RosterResult<Self> {
        let mut collection = Self {
            connection,
            datastore,
            auto_authorize,
            auto_subscribe,
            nodes: HashMap::new(),
        };
        if collection.datastore.is_some() {
            let added = collection.seed_from_datastore("roster construction")?;
            info!(added, "roster collection seeded from datastore");
        }
        Ok(collection)
    }

    /// Add a node for every owner the current datastore reports.
    fn seed_from_datastore(&mut self, operation: &str) -> RosterResult<usize> {
        let Some(datastore) = self.datastore.clone() else {
            return Err(RosterError::precondition(format!(
                "{operation} needs a datastore"
            )));
        };
        let owners = datastore
            .entries(None, &EntryFilter::all())
            .map_err(|e| RosterError::datastore(operation, e))?;

        let mut added = 0;
        for owner in owners {
            if self.insert_node(owner.bare())?.1 {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Get or create the node for `bare`. The flag reports creation.
    fn insert_node(&mut self, bare: Jid) -> RosterResult<(NodeHandle<N>, bool)> {
        if let Some(handle) = self.nodes.get(&bare) {
            return Ok((Arc::clone(handle), false));
        }
        let node = N::new(
            Arc::clone(&self.connection),
            bare.clone(),
            self.datastore.clone(),
        )?;
        let handle = Arc::new(RwLock::new(node));
        debug!(jid = %bare, "roster node created");
        self.nodes.insert(bare, Arc::clone(&handle));
        Ok((handle, true))
    }

    /// Return the node for `identity`, creating it on first use.
    ///
    /// A newly created node gets the collection's current `auto_authorize`
    /// and `auto_subscribe`. Existing nodes are returned untouched.
    pub fn lookup_or_create<I>(&mut self, identity: &I) -> RosterResult<NodeHandle<N>>
    where
        I: ToBareJid + ?Sized,
    {
        let bare = identity.to_bare_jid()?;
        let (handle, created) = self.insert_node(bare)?;
        if created {
            let mut node = write_node(&handle);
            node.set_auto_authorize(self.auto_authorize);
            node.set_auto_subscribe(self.auto_subscribe);
        }
        Ok(handle)
    }

    /// Ensure a node exists for `identity`. Idempotent; flags are not applied.
    pub fn add<I>(&mut self, identity: &I) -> RosterResult<()>
    where
        I: ToBareJid + ?Sized,
    {
        let bare = identity.to_bare_jid()?;
        self.insert_node(bare)?;
        Ok(())
    }

    /// The node for `identity`, if one exists. Never creates.
    pub fn get<I>(&self, identity: &I) -> RosterResult<Option<NodeHandle<N>>>
    where
        I: ToBareJid + ?Sized,
    {
        let bare = identity.to_bare_jid()?;
        Ok(self.nodes.get(&bare).cloned())
    }

    pub fn contains<I>(&self, identity: &I) -> RosterResult<bool>
    where
        I: ToBareJid + ?Sized,
    {
        let bare = identity.to_bare_jid()?;
        Ok(self.nodes.contains_key(&bare))
    }

    /// Bare identities currently managed, in no particular order.
    pub fn keys(&self) -> hash_map::Keys<'_, Jid, NodeHandle<N>> {
        self.nodes.keys()
    }

    /// Iterate over the managed identities. Same set as [`keys`](Self::keys).
    pub fn iter(&self) -> hash_map::Keys<'_, Jid, NodeHandle<N>> {
        self.nodes.keys()
    }

    /// Iterate over identities together with their nodes.
    pub fn nodes(&self) -> hash_map::Iter<'_, Jid, NodeHandle<N>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn connection(&self) -> &Arc<N::Connection> {
        &self.connection
    }

    pub fn backend(&self) -> Option<&SharedDatastore> {
        self.datastore.as_ref()
    }

    pub fn auto_authorize(&self) -> bool {
        self.auto_authorize
    }

    /// Applies to nodes created from now on.
    pub fn set_auto_authorize(&mut self, value: bool) {
        self.auto_authorize = value;
    }

    pub fn auto_subscribe(&self) -> bool {
        self.auto_subscribe
    }

    /// Applies to nodes created from now on.
    pub fn set_auto_subscribe(&mut self, value: bool) {
        self.auto_subscribe = value;
    }

    /// Replace the datastore and rebind every node to it.
    ///
    /// With `Some`, owners the new datastore reports are added first, then
    /// every node (new ones included) gets `set_backend` exactly once. With
    /// `None`, every node is unbound and nothing is enumerated.
    ///
    /// On failure the new datastore reference stays in place and nodes that
    /// were already rebound stay rebound.
    #[instrument(skip_all, fields(nodes = self.nodes.len(), attach = datastore.is_some()))]
    pub fn set_backend(&mut self, datastore: Option<SharedDatastore>) -> RosterResult<()> {
        self.datastore = datastore.clone();
        if self.datastore.is_some() {
            let added = self.seed_from_datastore("set_backend")?;
            debug!(added, "owners added from new datastore");
        }
        for (jid, handle) in &self.nodes {
            write_node(handle)
                .set_backend(datastore.clone())
                .inspect_err(|e| warn!(jid = %jid, error = %e, "failed to rebind roster node"))?;
        }
        info!(nodes = self.nodes.len(), "roster datastore replaced");
        Ok(())
    }

    /// Re-enumerate the current datastore and add any owners not yet known.
    /// Returns how many nodes were added.
    pub fn reload(&mut self) -> RosterResult<usize> {
        let added = self.seed_from_datastore("reload")?;
        debug!(added, "roster collection reloaded");
        Ok(added)
    }

    /// Reset every node, dropping transient presence. Keys are unchanged.
    ///
    /// Meant to run after the connection drops.
    pub fn reset(&self) {
        let _span = crate::collection_span!("reset", self.nodes.len()).entered();
        for handle in self.nodes.values() {
            write_node(handle).reset();
        }
        info!(nodes = self.nodes.len(), "roster collection reset");
    }
}

impl<'a, N: IRosterNode> IntoIterator for &'a RosterCollection<N> {
    type Item = &'a Jid;
    type IntoIter = hash_map::Keys<'a, Jid, NodeHandle<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.keys()
    }
}
