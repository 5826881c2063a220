use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::Extractor;
use crate::dom::DocumentTree;
use crate::error::ExtractionError;
use crate::models::{ConversationEntry, ExtractionReport, MISSING_TIMESTAMP};

impl Extractor {
    /// Enumerate the conversations of the sidebar listing rendered under `root`
    ///
    /// Each list item is classified by its resolved member count: one member makes a direct
    /// message, more make a channel, none drops the row. Rows are returned in document
    /// order. A row that cannot be built (no group id, channel without topic, repeated id)
    /// is skipped and recorded in the report without affecting the other rows.
    pub fn list_conversations<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        root: T::Node,
    ) -> ExtractionReport<ConversationEntry> {
        let mut report = ExtractionReport::new();
        let mut seen_ids = HashSet::new();

        for (index, row) in tree.descendants(root, &self.selectors.list_item).into_iter().enumerate() {
            match self.conversation_entry(tree, row, index, &mut report) {
                Ok(Some(entry)) => {
                    if !seen_ids.insert(entry.id().to_string()) {
                        warn!(index, id = entry.id(), "Skipping duplicate conversation");
                        report.push_issue(
                            index,
                            ExtractionError::DuplicateConversation { id: entry.id().to_string() },
                        );
                        continue;
                    }
                    debug!(index, id = entry.id(), kind = ?entry.kind(), "Listed conversation");
                    report.records.push(entry);
                }
                Ok(None) => {
                    debug!(index, "Dropping conversation row without members");
                }
                Err(e) => {
                    warn!(index, "Skipping conversation row: {}", e);
                    report.push_issue(index, e);
                }
            }
        }

        info!(
            conversations = report.records.len(),
            issues = report.issues.len(),
            "Listed conversations"
        );

        report
    }

    fn conversation_entry<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        row: T::Node,
        index: usize,
        report: &mut ExtractionReport<ConversationEntry>,
    ) -> Result<Option<ConversationEntry>, ExtractionError> {
        let id = tree
            .attribute(row, &self.attributes.group_id)
            .filter(|id| !id.is_empty())
            .ok_or(ExtractionError::StructuralAbsence { what: "group id" })?
            .to_string();

        let unread = tree.text_content(row).contains(self.unread_marker.as_str());

        let timestamp = self.listing_timestamp(tree, row).unwrap_or_else(|| {
            debug!(index, id = id.as_str(), "Conversation row has no timestamp");
            MISSING_TIMESTAMP.to_string()
        });

        let mut members = Vec::new();
        for member in tree.descendants(row, &self.selectors.member) {
            match self.resolve_identity(tree, member) {
                Ok(identity) => members.push(identity),
                Err(e) => {
                    warn!(index, id = id.as_str(), "Skipping conversation member: {}", e);
                    report.push_issue(index, e);
                }
            }
        }

        ConversationEntry::from_members(id, timestamp, unread, members, || {
            tree.first_descendant(row, &self.selectors.topic)
                .and_then(|node| tree.attribute(node, &self.attributes.topic))
                .map(str::to_string)
        })
    }
}
