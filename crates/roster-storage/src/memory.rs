//! MemoryDatastore: concurrent in-process roster storage via DashMap.

use std::collections::BTreeMap;

use dashmap::DashMap;

use roster_core::errors::DatastoreResult;
use roster_core::models::{EntryFilter, RosterItem};
use roster_core::traits::IRosterDatastore;
use roster_core::Jid;

/// Owner → (contact → item). Keys are bare JIDs.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    rosters: DashMap<Jid, BTreeMap<Jid, RosterItem>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owners with at least one stored item.
    pub fn owner_count(&self) -> usize {
        self.rosters.iter().filter(|r| !r.value().is_empty()).count()
    }

    /// Total stored items across all owners.
    pub fn item_count(&self) -> usize {
        self.rosters.iter().map(|r| r.value().len()).sum()
    }
}

impl IRosterDatastore for MemoryDatastore {
    fn entries(&self, owner: Option<&Jid>, filter: &EntryFilter) -> DatastoreResult<Vec<Jid>> {
        let found: Vec<Jid> = match owner {
            Some(owner) => self
                .rosters
                .get(&owner.bare())
                .map(|items| {
                    items
                        .values()
                        .filter(|item| filter.matches(item))
                        .map(|item| item.jid.clone())
                        .collect()
                })
                .unwrap_or_default(),
            None => self
                .rosters
                .iter()
                .filter(|r| r.value().values().any(|item| filter.matches(item)))
                .map(|r| r.key().clone())
                .collect(),
        };
        Ok(found)
    }

    fn load(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<Option<RosterItem>> {
        Ok(self
            .rosters
            .get(&owner.bare())
            .and_then(|items| items.get(&contact.bare()).cloned()))
    }

    fn save(&self, owner: &Jid, item: &RosterItem) -> DatastoreResult<()> {
        let mut stored = item.clone();
        stored.jid = item.jid.bare();
        self.rosters
            .entry(owner.bare())
            .or_default()
            .insert(stored.jid.clone(), stored);
        Ok(())
    }

    fn remove(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<bool> {
        let owner = owner.bare();
        let removed = match self.rosters.get_mut(&owner) {
            Some(mut items) => items.remove(&contact.bare()).is_some(),
            None => false,
        };
        self.rosters.remove_if(&owner, |_, items| items.is_empty());
        Ok(removed)
    }
}
