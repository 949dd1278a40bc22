//! EntryFilter: the mapping passed to `IRosterDatastore::entries`.

use serde::{Deserialize, Serialize};

use super::roster_item::{RosterItem, Subscription};

/// Restricts which roster entries a datastore reports.
///
/// Every `None` field matches anything, so `EntryFilter::all()` is the empty
/// filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    pub subscription: Option<Subscription>,
    pub group: Option<String>,
    pub whitelisted: Option<bool>,
}

impl EntryFilter {
    /// The empty filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.subscription.is_none() && self.group.is_none() && self.whitelisted.is_none()
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_whitelisted(mut self, whitelisted: bool) -> Self {
        self.whitelisted = Some(whitelisted);
        self
    }

    pub fn matches(&self, item: &RosterItem) -> bool {
        if let Some(sub) = self.subscription {
            if item.subscription != sub {
                return false;
            }
        }
        if let Some(group) = &self.group {
            if !item.groups.contains(group) {
                return false;
            }
        }
        if let Some(whitelisted) = self.whitelisted {
            if item.whitelisted != whitelisted {
                return false;
            }
        }
        true
    }
}
