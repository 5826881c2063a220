use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identity, timestamp_to_datetime};

/// One top-level message of the active conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub author: Identity,
    /// Latest activity on the message, thread replies included
    pub timestamp: String,
    /// Normalized body: markup, image reference, or a documented sentinel
    pub content: String,
}

impl Message {
    pub fn timestamp_datetime(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(&self.timestamp)
    }
}
