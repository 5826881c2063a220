use tracing::{debug, info, warn};

use super::Extractor;
use crate::dom::DocumentTree;
use crate::error::ExtractionError;
use crate::models::{ExtractionReport, MISSING_TIMESTAMP, Message};

impl Extractor {
    /// Extract the top-level messages of the conversation rendered under `root`
    ///
    /// Messages come back in document order, one per message node, without deduplication.
    /// Thread replies are not separate records; their latest time is folded into the
    /// timestamp of the message they hang off.
    ///
    /// Every message node yields a record. Absences are answered with placeholders and
    /// recorded in the report under the message's index.
    pub fn list_messages<T: DocumentTree + ?Sized>(&self, tree: &T, root: T::Node) -> ExtractionReport<Message> {
        let mut report = ExtractionReport::new();

        for (index, node) in tree.descendants(root, &self.selectors.message).into_iter().enumerate() {
            let (author, author_issue) = self.resolve_author(tree, node);
            if let Some(issue) = author_issue {
                report.push_issue(index, issue);
            }

            let timestamp = match self.resolve_timestamp(tree, node) {
                Some(timestamp) => timestamp,
                None => {
                    report.push_issue(index, ExtractionError::MissingTimestamp);
                    MISSING_TIMESTAMP.to_string()
                }
            };

            let normalized = self.normalize_content(tree, node);
            for issue in normalized.issues {
                report.push_issue(index, issue);
            }

            debug!(index, author = %author.address(), timestamp = timestamp.as_str(), "Extracted message");
            report.records.push(Message { author, timestamp, content: normalized.content });
        }

        if !report.is_clean() {
            warn!(issues = report.issues.len(), "Message extraction met incomplete nodes");
        }
        info!(messages = report.records.len(), issues = report.issues.len(), "Extracted messages");

        report
    }
}
