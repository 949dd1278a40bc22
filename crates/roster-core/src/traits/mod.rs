mod datastore;
mod roster_node;

pub use datastore::{IRosterDatastore, SharedDatastore};
pub use roster_node::IRosterNode;
