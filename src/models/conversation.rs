use std::slice;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identity, timestamp_to_datetime};
use crate::error::ExtractionError;

/// Multi-member conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub topic: String,
    pub timestamp: String,
    pub unread: bool,
    pub members: Vec<Identity>,
    pub member_count: usize,
}

/// One-on-one conversation, the other party's identity flattened into the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    #[serde(flatten)]
    pub identity: Identity,
    pub id: String,
    pub timestamp: String,
    pub unread: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Channel,
    Dm,
}

/// One row of the sidebar listing
///
/// Serializes with a `kind` discriminator of `"channel"` or `"dm"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ConversationEntry {
    #[serde(rename = "channel")]
    Channel(Channel),
    #[serde(rename = "dm")]
    DirectMessage(DirectMessage),
}

impl ConversationEntry {
    /// Classify by resolved member count: none yields `Ok(None)`, one a direct message,
    /// more a channel. The topic is only consulted for channels.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::StructuralAbsence`] for a channel whose topic is missing.
    pub fn from_members(
        id: String,
        timestamp: String,
        unread: bool,
        mut members: Vec<Identity>,
        topic: impl FnOnce() -> Option<String>,
    ) -> Result<Option<Self>, ExtractionError> {
        match members.len() {
            0 => Ok(None),
            1 => {
                let identity = members.remove(0);
                Ok(Some(Self::DirectMessage(DirectMessage { identity, id, timestamp, unread })))
            }
            member_count => {
                let topic = topic().ok_or(ExtractionError::StructuralAbsence { what: "topic" })?;
                Ok(Some(Self::Channel(Channel { id, topic, timestamp, unread, members, member_count })))
            }
        }
    }

    pub fn kind(&self) -> ConversationKind {
        match self {
            Self::Channel(_) => ConversationKind::Channel,
            Self::DirectMessage(_) => ConversationKind::Dm,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Channel(channel) => &channel.id,
            Self::DirectMessage(dm) => &dm.id,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::Channel(channel) => &channel.timestamp,
            Self::DirectMessage(dm) => &dm.timestamp,
        }
    }

    pub fn unread(&self) -> bool {
        match self {
            Self::Channel(channel) => channel.unread,
            Self::DirectMessage(dm) => dm.unread,
        }
    }

    pub fn members(&self) -> &[Identity] {
        match self {
            Self::Channel(channel) => &channel.members,
            Self::DirectMessage(dm) => slice::from_ref(&dm.identity),
        }
    }

    pub fn timestamp_datetime(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.timestamp())
    }
}
