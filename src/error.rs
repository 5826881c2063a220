use serde::Serialize;
use thiserror::Error;

/// Per-record extraction conditions.
///
/// None of these abort a listing. Depending on the variant the affected record is either
/// emitted with a sentinel/default value or skipped, and the condition is recorded in the
/// [`ExtractionReport`](crate::models::ExtractionReport) returned by the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionError {
    /// Composite member identifier absent or without an `@`
    #[error("Malformed identity: {}", .raw.as_deref().unwrap_or("<missing>"))]
    MalformedIdentity { raw: Option<String> },

    /// Neither text nor an image attachment was found in a message
    #[error("Message content missing")]
    MissingContent,

    /// An image attachment was found but its URL could not be read
    #[error("Image URL missing")]
    MissingImageUrl,

    /// No timestamp-carrying node was found
    #[error("Timestamp missing")]
    MissingTimestamp,

    /// A node required for the record was not rendered
    #[error("Structural absence: {what}")]
    StructuralAbsence { what: &'static str },

    /// A conversation id that already appeared earlier in the listing
    #[error("Duplicate conversation id: {id}")]
    DuplicateConversation { id: String },
}

/// Error raised while parsing a selector expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid selector '{input}' at position {position}: {message}")]
pub struct SelectorError {
    pub input: String,
    pub position: usize,
    pub message: String,
}
