//! Timestamp resolution.
//!
//! Two reads exist and they differ on purpose:
//!
//! - The conversation listing uses [`Extractor::listing_timestamp`], the first timestamp
//!   node of the row.
//! - The message stream uses [`Extractor::resolve_timestamp`], the latest timestamp found
//!   anywhere at or below the message node. A thread handle rendered beneath a message
//!   carries the thread's latest reply time, and the listing already reports that time for
//!   the conversation. Taking the maximum keeps "newest known message" and "conversation
//!   last active" in agreement, so a consumer comparing the two does not chase unread
//!   messages that are not in the stream.
//!
//! Timestamps are fixed-width zero-padded decimal seconds, so the lexical maximum is the
//! numeric maximum.

use tracing::warn;

use super::Extractor;
use crate::dom::DocumentTree;

/// Drop the fractional part of a decimal timestamp; `None` when nothing is left
pub fn truncate_timestamp(raw: &str) -> Option<&str> {
    let seconds = raw.split('.').next().unwrap_or_default().trim();
    if seconds.is_empty() { None } else { Some(seconds) }
}

/// Lexical maximum of the given timestamp strings
pub fn latest_timestamp<'a>(timestamps: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    timestamps.into_iter().max()
}

impl Extractor {
    /// Timestamp shown for a sidebar row, from its first timestamp node
    pub fn listing_timestamp<T: DocumentTree + ?Sized>(&self, tree: &T, row: T::Node) -> Option<String> {
        let node = tree.first_descendant(row, &self.selectors.timestamp)?;
        tree.attribute(node, &self.attributes.timestamp)
            .and_then(truncate_timestamp)
            .map(str::to_string)
    }

    /// Effective timestamp of a message: the latest value carried by the message node or
    /// any element beneath it, thread handles included
    ///
    /// Returns `None` when no element in the subtree carries a usable timestamp.
    pub fn resolve_timestamp<T: DocumentTree + ?Sized>(&self, tree: &T, message: T::Node) -> Option<String> {
        let attribute = self.attributes.timestamp.as_str();
        let nested = tree.descendants(message, &self.selectors.any_timestamp);

        let values = std::iter::once(message)
            .chain(nested)
            .filter_map(|node| tree.attribute(node, attribute))
            .filter_map(truncate_timestamp);

        let latest = latest_timestamp(values).map(str::to_string);
        if latest.is_none() {
            warn!("Message has no timestamp node");
        }
        latest
    }
}
