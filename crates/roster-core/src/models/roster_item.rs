//! RosterItem: persisted state for one contact in one owner's roster.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jid::Jid;

/// Subscription state between an owner and a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    None,
    To,
    From,
    Both,
}

impl Subscription {
    pub const ALL: [Subscription; 4] = [Self::None, Self::To, Self::From, Self::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::To => "to",
            Self::From => "from",
            Self::Both => "both",
        }
    }

    /// Inverse of [`Subscription::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sub| sub.as_str() == s)
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterItem {
    /// Contact identity, always bare.
    pub jid: Jid,
    /// Display name chosen by the owner.
    pub name: Option<String>,
    /// Roster groups.
    #[serde(default)]
    pub groups: BTreeSet<String>,
    pub subscription: Subscription,
    /// Contact asked to subscribe to the owner and has not been answered.
    #[serde(default)]
    pub pending_in: bool,
    /// Owner asked to subscribe to the contact and has not been answered.
    #[serde(default)]
    pub pending_out: bool,
    /// Contact is pre-approved for subscription.
    #[serde(default)]
    pub whitelisted: bool,
    pub updated_at: DateTime<Utc>,
}

impl RosterItem {
    /// New item with no subscription. Any resource on `jid` is dropped.
    pub fn new(jid: &Jid) -> Self {
        Self {
            jid: jid.bare(),
            name: None,
            groups: BTreeSet::new(),
            subscription: Subscription::None,
            pending_in: false,
            pending_out: false,
            whitelisted: false,
            updated_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = subscription;
        self
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
