use serde::{Deserialize, Serialize};

/// `user` value of the placeholder author given to messages whose identity is unreadable
pub const UNKNOWN_USER: &str = "--unknown user--";

/// A conversation member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub realname: String,
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn new(realname: &str, user: &str, host: &str) -> Self {
        Self { realname: realname.to_string(), user: user.to_string(), host: host.to_string() }
    }

    /// Placeholder for an author whose composite identifier could not be resolved
    pub fn unknown(realname: Option<&str>) -> Self {
        Self::new(realname.unwrap_or_default(), UNKNOWN_USER, "")
    }

    pub fn is_unknown(&self) -> bool {
        self.user == UNKNOWN_USER && self.host.is_empty()
    }

    /// The composite `user@host` form
    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}
