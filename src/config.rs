//! Extractor configuration.
//!
//! Every predicate, attribute name and marker the extractors rely on lives here so a change
//! in the host application's markup can be absorbed with a TOML file instead of a release.
//! All fields default to the values matching the current web client, so an empty file (or
//! no file) is a valid configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub attributes: AttributeConfig,

    #[serde(default)]
    pub markers: MarkerConfig,

    #[serde(default)]
    pub image_rewrite: ImageRewriteConfig,
}

/// Structural predicates, in selector syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One sidebar row per match
    pub list_item: String,
    /// Member nodes inside a row or a message
    pub member: String,
    /// Titled node carrying a channel's topic
    pub topic: String,
    /// Timestamp node read by the conversation listing
    pub timestamp: String,
    /// Top-level user message, as opposed to UI chrome
    pub message: String,
    /// Rich-content block of a message
    pub content_block: String,
    /// Image attachment anchor
    pub image: String,
    /// Image element nested in the anchor, used when the anchor has no link
    pub image_source: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            list_item: "span[role=listitem]".to_string(),
            member: "span[data-member-id]".to_string(),
            topic: "span[role=presentation][title]".to_string(),
            timestamp: "span[data-absolute-timestamp]".to_string(),
            message: "c-wiz[data-is-user-topic=true]".to_string(),
            content_block: "div[jsaction*=mouseenter][jslog*=impression] div[jscontroller]"
                .to_string(),
            image: "a[aria-label*=Image]".to_string(),
            image_source: "img[src]".to_string(),
        }
    }
}

/// Attribute names read from matched nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    pub group_id: String,
    /// Member display name
    pub name: String,
    /// Composite `user@host` identifier
    pub identity: String,
    /// Decimal seconds, possibly with a fractional part
    pub timestamp: String,
    /// Channel topic, read from the topic node
    pub topic: String,
    /// Image caption
    pub caption: String,
    pub href: String,
    pub src: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            group_id: "data-group-id".to_string(),
            name: "data-name".to_string(),
            identity: "data-hovercard-id".to_string(),
            timestamp: "data-absolute-timestamp".to_string(),
            topic: "title".to_string(),
            caption: "title".to_string(),
            href: "href".to_string(),
            src: "src".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Text rendered inside a row with unread messages
    pub unread: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { unread: "Unread".to_string() }
    }
}

/// Token substitutions forcing a full-resolution image URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRewriteConfig {
    pub download_marker: String,
    pub serve_marker: String,
    /// Width written into the `sz=w<width>` size hint
    pub width: u32,
}

impl Default for ImageRewriteConfig {
    fn default() -> Self {
        Self {
            download_marker: "DOWNLOAD_URL".to_string(),
            serve_marker: "FIFE_URL".to_string(),
            width: 1920,
        }
    }
}

impl ExtractorConfig {
    /// Parse a TOML document; missing tables and keys take their defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("Failed to parse extractor configuration")
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded extractor configuration");
        Ok(config)
    }
}
