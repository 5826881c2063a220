//! Extraction pipeline: rendered tree nodes in, transcript records out.
//!
//! # Components
//!
//! - [`identity`] - composite `user@host` identifier to [`Identity`](crate::models::Identity)
//! - [`timestamp`] - effective message timestamp, thread replies included
//! - [`content`] - message body normalization and image URL rewriting
//! - [`conversations`] - sidebar listing entry point
//! - [`messages`] - active conversation entry point
//!
//! # Error Handling Strategy
//!
//! Failures are isolated per record so one odd node never costs the rest of the listing:
//!
//! - **Recoverable absences**: missing content, image URL or timestamp are replaced by the
//!   documented sentinel strings (or `"0"`), the record is still emitted, and the condition
//!   is logged and recorded in the [`ExtractionReport`](crate::models::ExtractionReport).
//!
//! - **Unresolvable members**: a member without a valid composite identifier is left out of
//!   a conversation's member list. A message author in the same state is replaced by a
//!   placeholder identity so the message body is not lost.
//!
//! - **Structural absence**: a row without a group id, or a channel without a topic node, is
//!   skipped and recorded; processing continues with the next row.
//!
//! Entry points never return `Err`. Only building an [`Extractor`] from a configuration can
//! fail, when a configured selector does not parse.

use crate::config::{AttributeConfig, ExtractorConfig};
use crate::dom::Selector;
use crate::error::SelectorError;

pub mod content;
pub mod conversations;
pub mod identity;
pub mod messages;
pub mod timestamp;

pub use content::{IMAGE_URL_MISSING, ImageUrlRewriter, MISSING_CONTENT, NormalizedContent};
pub use identity::split_composite_identifier;
pub use timestamp::{latest_timestamp, truncate_timestamp};

#[derive(Debug, Clone)]
struct Selectors {
    list_item: Selector,
    member: Selector,
    topic: Selector,
    timestamp: Selector,
    /// Any element carrying the timestamp attribute
    any_timestamp: Selector,
    message: Selector,
    content_block: Selector,
    image: Selector,
    image_source: Selector,
}

/// Compiled extraction settings
///
/// Holds no state between calls; every entry point reads only the tree it is given, so an
/// `Extractor` can be shared freely and reused across conversation switches.
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Selectors,
    attributes: AttributeConfig,
    unread_marker: String,
    rewriter: ImageUrlRewriter,
}

impl Extractor {
    /// Compile the selectors of `config`
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] naming the first configured selector that fails to parse.
    pub fn new(config: &ExtractorConfig) -> Result<Self, SelectorError> {
        let configured = &config.selectors;
        let selectors = Selectors {
            list_item: Selector::parse(&configured.list_item)?,
            member: Selector::parse(&configured.member)?,
            topic: Selector::parse(&configured.topic)?,
            timestamp: Selector::parse(&configured.timestamp)?,
            any_timestamp: Selector::parse(&format!("[{}]", config.attributes.timestamp))?,
            message: Selector::parse(&configured.message)?,
            content_block: Selector::parse(&configured.content_block)?,
            image: Selector::parse(&configured.image)?,
            image_source: Selector::parse(&configured.image_source)?,
        };

        Ok(Self {
            selectors,
            attributes: config.attributes.clone(),
            unread_marker: config.markers.unread.clone(),
            rewriter: ImageUrlRewriter::new(&config.image_rewrite),
        })
    }

    /// Extractor for the built-in configuration
    pub fn with_defaults() -> Result<Self, SelectorError> {
        Self::new(&ExtractorConfig::default())
    }

    pub fn rewriter(&self) -> &ImageUrlRewriter {
        &self.rewriter
    }
}
