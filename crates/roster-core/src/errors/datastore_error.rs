/// Errors raised by datastore adapters.
#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    #[error("datastore unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("query failed: {message}")]
    Query { message: String },

    #[error("corrupt roster row for {owner}/{contact}: {details}")]
    Corrupt {
        owner: String,
        contact: String,
        details: String,
    },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },
}

impl From<serde_json::Error> for DatastoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
