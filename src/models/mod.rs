//! Records produced by the extractors.
//!
//! - [`Identity`] - A member resolved from a composite `user@host` identifier
//! - [`ConversationEntry`] - One row of the sidebar listing, a [`Channel`] or a [`DirectMessage`]
//! - [`Message`] - One top-level message of the active conversation
//! - [`ExtractionReport`] - Records of one call plus the per-node issues met along the way
//!
//! All records are plain values built fresh on every call and serialize to the JSON shape
//! downstream consumers diff and persist.

use chrono::{DateTime, Utc};

pub mod conversation;
pub mod identity;
pub mod message;
pub mod report;

pub use conversation::{Channel, ConversationEntry, ConversationKind, DirectMessage};
pub use identity::{Identity, UNKNOWN_USER};
pub use message::Message;
pub use report::{ExtractionIssue, ExtractionReport};

/// Timestamp used when no timestamp node was rendered
pub const MISSING_TIMESTAMP: &str = "0";

/// Convert a decimal-seconds timestamp string into a UTC datetime
///
/// Returns `None` for the [`MISSING_TIMESTAMP`] default and for values that are not a
/// representable number of seconds.
pub fn timestamp_to_datetime(timestamp: &str) -> Option<DateTime<Utc>> {
    if timestamp == MISSING_TIMESTAMP {
        return None;
    }
    let seconds = timestamp.parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}
