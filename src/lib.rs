//! Chat Transcript - Extract conversations and messages from a rendered chat client
//!
//! This library reads the rendered element tree of a web chat client and turns it into
//! plain transcript records. It supports:
//!
//! - Listing the conversations of the sidebar as channels and direct messages
//! - Extracting the top-level messages of the active conversation, thread activity included
//! - Normalizing message bodies and rewriting image attachment URLs to full resolution
//! - Reading captured trees from HTML pages or JSON node dumps
//!
//! Extraction works against any [`DocumentTree`] implementation, so the same code serves a
//! live rendering layer and a saved [`Snapshot`].
//!
//! # Example
//!
//! ```
//! use chat_transcript::{Extractor, Snapshot};
//!
//! let html = r#"<span role="listitem" data-group-id="dm/ada">
//!     <span data-member-id="1" data-name="Ada" data-hovercard-id="ada@example.com"></span>
//! </span>"#;
//!
//! let snapshot = Snapshot::from_html(html);
//! let extractor = Extractor::with_defaults()?;
//! let report = extractor.list_conversations(&snapshot, snapshot.root());
//! assert_eq!(report.records[0].id(), "dm/ada");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::ExtractorConfig;
pub use dom::{DocumentTree, Selector, Snapshot, SnapshotElement};
pub use error::{ExtractionError, SelectorError};
pub use extract::{Extractor, IMAGE_URL_MISSING, MISSING_CONTENT};
pub use models::{
    Channel, ConversationEntry, ConversationKind, DirectMessage, ExtractionIssue, ExtractionReport,
    Identity, MISSING_TIMESTAMP, Message, UNKNOWN_USER,
};
pub use utils::load_snapshot;
