//! Network identities (`local@domain/resource`) and bare-form normalization.
//!
//! # Examples
//!
//! ```
//! use roster_core::Jid;
//!
//! let full: Jid = "user@example.com/phone".parse().unwrap();
//! assert_eq!(full.resource(), Some("phone"));
//! assert_eq!(full.bare().to_string(), "user@example.com");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{LOCAL_SEPARATOR, RESOURCE_SEPARATOR};
use crate::errors::{RosterError, RosterResult};

/// A network identity with an optional local part and optional resource.
///
/// No case folding or stringprep is applied: two JIDs are equal only when
/// their textual parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    local: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Parse a JID in either full or bare form.
    pub fn parse(input: &str) -> RosterResult<Self> {
        if input.is_empty() {
            return Err(RosterError::invalid_identity(input, "empty identity"));
        }
        let (bare, resource) = match input.split_once(RESOURCE_SEPARATOR) {
            Some((_, "")) => {
                return Err(RosterError::invalid_identity(input, "empty resource"));
            }
            Some((bare, resource)) => (bare, Some(resource.to_string())),
            None => (input, None),
        };

        let (local, domain) = match bare.split_once(LOCAL_SEPARATOR) {
            Some(("", _)) => {
                return Err(RosterError::invalid_identity(input, "empty local part"));
            }
            Some((local, domain)) => (Some(local.to_string()), domain),
            None => (None, bare),
        };

        if domain.is_empty() {
            return Err(RosterError::invalid_identity(input, "empty domain"));
        }
        if domain.contains(LOCAL_SEPARATOR) {
            return Err(RosterError::invalid_identity(
                input,
                "more than one local separator",
            ));
        }
        // Resources are free-form; only the bare part must be whitespace-free.
        if bare.chars().any(char::is_whitespace) {
            return Err(RosterError::invalid_identity(input, "contains whitespace"));
        }

        Ok(Self {
            local,
            domain: domain.to_string(),
            resource,
        })
    }

    /// The bare form: this identity without its resource.
    pub fn bare(&self) -> Self {
        Self {
            local: self.local.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// This identity bound to `resource`.
    pub fn with_resource(&self, resource: &str) -> RosterResult<Self> {
        if resource.is_empty() {
            return Err(RosterError::invalid_identity(
                format!("{self}/"),
                "empty resource",
            ));
        }
        Ok(Self {
            resource: Some(resource.to_string()),
            ..self.bare()
        })
    }

    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(local) = &self.local {
            write!(f, "{local}{LOCAL_SEPARATOR}")?;
        }
        f.write_str(&self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "{RESOURCE_SEPARATOR}{resource}")?;
        }
        Ok(())
    }
}

impl FromStr for Jid {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Jid {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}

/// Normalization to the bare form used as a roster key.
///
/// Every entry point that accepts an identity goes through this, so
/// `"a@x/r1"`, `"a@x"` and a parsed `Jid` all land on the same key.
pub trait ToBareJid {
    fn to_bare_jid(&self) -> RosterResult<Jid>;
}

impl ToBareJid for str {
    fn to_bare_jid(&self) -> RosterResult<Jid> {
        Jid::parse(self).map(|jid| jid.bare())
    }
}

impl ToBareJid for String {
    fn to_bare_jid(&self) -> RosterResult<Jid> {
        self.as_str().to_bare_jid()
    }
}

impl ToBareJid for Jid {
    fn to_bare_jid(&self) -> RosterResult<Jid> {
        Ok(self.bare())
    }
}
