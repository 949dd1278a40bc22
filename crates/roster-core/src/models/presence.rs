use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last presence seen from one resource of a contact. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceResource {
    pub resource: String,
    /// `away`, `chat`, `dnd`, `xa`, or `None` for plain available.
    pub show: Option<String>,
    pub status: Option<String>,
    pub priority: i8,
    pub received_at: DateTime<Utc>,
}

impl PresenceResource {
    pub fn available(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            show: None,
            status: None,
            priority: 0,
            received_at: Utc::now(),
        }
    }

    pub fn with_show(mut self, show: impl Into<String>) -> Self {
        self.show = Some(show.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }
}
