//! Span definitions for collection-wide operations.

/// Create a span for a collection-wide operation.
#[macro_export]
macro_rules! collection_span {
    ($operation:expr, $nodes:expr) => {
        tracing::info_span!("roster.collection", operation = $operation, nodes = $nodes)
    };
}

/// Create a span for work on a single node.
#[macro_export]
macro_rules! node_span {
    ($operation:expr, $jid:expr) => {
        tracing::debug_span!("roster.node", operation = $operation, jid = %$jid)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const COLLECTION: &str = "roster.collection";
    pub const NODE: &str = "roster.node";
}
