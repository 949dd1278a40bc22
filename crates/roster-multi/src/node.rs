//! RosterNode: roster items and live presence for one bare identity.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use roster_core::errors::{RosterError, RosterResult};
use roster_core::models::{EntryFilter, PresenceResource, RosterItem};
use roster_core::traits::{IRosterNode, SharedDatastore};
use roster_core::{constants, Jid};

/// Default node implementation.
///
/// Items are persisted write-through when a datastore is bound. Presence is
/// transient and cleared by [`IRosterNode::reset`].
pub struct RosterNode<C: ?Sized> {
    connection: Arc<C>,
    jid: Jid,
    datastore: Option<SharedDatastore>,
    auto_authorize: bool,
    auto_subscribe: bool,
    items: BTreeMap<Jid, RosterItem>,
    /// Contact (bare) → resource name → last presence.
    presence: HashMap<Jid, BTreeMap<String, PresenceResource>>,
}

impl<C: ?Sized> RosterNode<C> {
    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    pub fn backend(&self) -> Option<&SharedDatastore> {
        self.datastore.as_ref()
    }

    fn require_backend(&self, operation: &str) -> RosterResult<SharedDatastore> {
        self.datastore.clone().ok_or_else(|| {
            RosterError::precondition(format!("{operation} on {} needs a datastore", self.jid))
        })
    }

    /// Pull every item the datastore holds for this identity, replacing local
    /// copies. Returns how many items were loaded.
    pub fn load_from_backend(&mut self) -> RosterResult<usize> {
        let datastore = self.require_backend("load_from_backend")?;
        let mut loaded = 0;
        for contact in datastore
            .entries(Some(&self.jid), &EntryFilter::all())
            .map_err(|e| RosterError::datastore("list roster items", e))?
        {
            let item = datastore
                .load(&self.jid, &contact)
                .map_err(|e| RosterError::datastore("load roster item", e))?;
            if let Some(item) = item {
                self.items.insert(item.jid.bare(), item);
                loaded += 1;
            }
        }
        tracing::debug!(jid = %self.jid, loaded, "roster items loaded from datastore");
        Ok(loaded)
    }

    /// Insert or replace an item, persisting it first when a datastore is bound.
    pub fn add_item(&mut self, mut item: RosterItem) -> RosterResult<()> {
        item.jid = item.jid.bare();
        item.touch();
        if let Some(datastore) = &self.datastore {
            datastore
                .save(&self.jid, &item)
                .map_err(|e| RosterError::datastore("save roster item", e))?;
        }
        self.items.insert(item.jid.clone(), item);
        Ok(())
    }

    /// Remove an item and any presence held for it.
    pub fn remove_item(&mut self, contact: &Jid) -> RosterResult<Option<RosterItem>> {
        let contact = contact.bare();
        if let Some(datastore) = &self.datastore {
            datastore
                .remove(&self.jid, &contact)
                .map_err(|e| RosterError::datastore("remove roster item", e))?;
        }
        self.presence.remove(&contact);
        Ok(self.items.remove(&contact))
    }

    pub fn item(&self, contact: &Jid) -> Option<&RosterItem> {
        self.items.get(&contact.bare())
    }

    pub fn items(&self) -> impl Iterator<Item = &RosterItem> {
        self.items.values()
    }

    pub fn contains(&self, contact: &Jid) -> bool {
        self.items.contains_key(&contact.bare())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record presence from one resource of `from`.
    pub fn update_presence(&mut self, from: &Jid, presence: PresenceResource) {
        self.presence
            .entry(from.bare())
            .or_default()
            .insert(presence.resource.clone(), presence);
    }

    /// Drop presence for `from`: one resource for a full JID, every resource
    /// for a bare one. Returns whether anything was removed.
    pub fn remove_presence(&mut self, from: &Jid) -> bool {
        let bare = from.bare();
        let Some(resource) = from.resource() else {
            return self.presence.remove(&bare).is_some();
        };
        let Some(resources) = self.presence.get_mut(&bare) else {
            return false;
        };
        let removed = resources.remove(resource).is_some();
        if resources.is_empty() {
            self.presence.remove(&bare);
        }
        removed
    }

    /// Resources of `contact` currently available, highest priority first.
    pub fn resources(&self, contact: &Jid) -> Vec<&PresenceResource> {
        let mut resources: Vec<_> = self
            .presence
            .get(&contact.bare())
            .map(|r| r.values().collect())
            .unwrap_or_default();
        resources.sort_by(|a, b| b.priority.cmp(&a.priority));
        resources
    }

    pub fn is_available(&self, contact: &Jid) -> bool {
        self.presence
            .get(&contact.bare())
            .is_some_and(|r| !r.is_empty())
    }
}

impl<C: ?Sized + Send + Sync> IRosterNode for RosterNode<C> {
    type Connection = C;

    fn new(
        connection: Arc<C>,
        jid: Jid,
        datastore: Option<SharedDatastore>,
    ) -> RosterResult<Self> {
        let mut node = Self {
            connection,
            jid: jid.bare(),
            datastore,
            auto_authorize: constants::DEFAULT_AUTO_AUTHORIZE,
            auto_subscribe: constants::DEFAULT_AUTO_SUBSCRIBE,
            items: BTreeMap::new(),
            presence: HashMap::new(),
        };
        if node.datastore.is_some() {
            node.load_from_backend()?;
        }
        Ok(node)
    }

    fn jid(&self) -> &Jid {
        &self.jid
    }

    fn reset(&mut self) {
        let _span = crate::node_span!("reset", self.jid).entered();
        let dropped = self.presence.len();
        self.presence.clear();
        tracing::debug!(dropped, "presence cleared");
    }

    /// Saves local items into the new datastore, then loads the ones it holds
    /// that are missing locally.
    fn set_backend(&mut self, datastore: Option<SharedDatastore>) -> RosterResult<()> {
        let _span = crate::node_span!("set_backend", self.jid).entered();
        self.datastore = datastore;
        let Some(datastore) = self.datastore.clone() else {
            return Ok(());
        };

        for item in self.items.values() {
            datastore
                .save(&self.jid, item)
                .map_err(|e| RosterError::datastore("rebind roster node", e))?;
        }
        let stored = datastore
            .entries(Some(&self.jid), &EntryFilter::all())
            .map_err(|e| RosterError::datastore("rebind roster node", e))?;
        for contact in stored {
            if self.items.contains_key(&contact) {
                continue;
            }
            if let Some(item) = datastore
                .load(&self.jid, &contact)
                .map_err(|e| RosterError::datastore("rebind roster node", e))?
            {
                self.items.insert(item.jid.bare(), item);
            }
        }
        Ok(())
    }

    fn auto_authorize(&self) -> bool {
        self.auto_authorize
    }

    fn set_auto_authorize(&mut self, value: bool) {
        self.auto_authorize = value;
    }

    fn auto_subscribe(&self) -> bool {
        self.auto_subscribe
    }

    fn set_auto_subscribe(&mut self, value: bool) {
        self.auto_subscribe = value;
    }
}
