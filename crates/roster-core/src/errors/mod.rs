//! Error types for the roster multiplexer.
//!
//! `RosterError` is what every public operation returns. Datastore adapters
//! raise `DatastoreError`, which is wrapped into
//! `RosterError::DatastoreUnavailable` together with the operation that failed.

mod datastore_error;

pub use datastore_error::DatastoreError;

/// Result alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Result alias for datastore adapter operations.
pub type DatastoreResult<T> = Result<T, DatastoreError>;

/// Top-level roster error.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("invalid identity {input:?}: {reason}")]
    InvalidIdentity { input: String, reason: String },

    #[error("datastore unavailable during {operation}: {source}")]
    DatastoreUnavailable {
        operation: String,
        #[source]
        source: DatastoreError,
    },

    #[error("precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl RosterError {
    /// Build an `InvalidIdentity` error.
    pub fn invalid_identity(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a datastore failure with the name of the operation that hit it.
    pub fn datastore(operation: impl Into<String>, source: DatastoreError) -> Self {
        Self::DatastoreUnavailable {
            operation: operation.into(),
            source,
        }
    }

    /// Build a `PreconditionFailed` error.
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            reason: reason.into(),
        }
    }
}
