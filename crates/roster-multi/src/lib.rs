//! # roster-multi
//!
//! Roster state for every identity owned by one connection or component.
//!
//! A [`RosterCollection`] maps bare JIDs to roster nodes. Nodes are created
//! lazily on lookup (receiving the collection's current `auto_authorize` /
//! `auto_subscribe` defaults) or eagerly from the datastore, share the
//! collection's datastore, and are reset in bulk after a disconnect.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use roster_core::IRosterNode;
//! use roster_multi::{read_node, RosterCollection, RosterNode};
//!
//! struct Connection;
//!
//! let mut roster: RosterCollection<RosterNode<Connection>> =
//!     RosterCollection::new(Arc::new(Connection), None).unwrap();
//!
//! let node = roster.lookup_or_create("user@example.com/resource").unwrap();
//! assert_eq!(read_node(&node).jid().to_string(), "user@example.com");
//! assert_eq!(roster.len(), 1);
//! ```

pub mod collection;
pub mod node;
pub mod spans;

pub use collection::{read_node, write_node, NodeHandle, RosterCollection};
pub use node::RosterNode;
