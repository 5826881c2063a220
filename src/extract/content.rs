//! Message body normalization.
//!
//! A body is composed from two optional parts:
//!
//! ```text
//! text                    markup of the rich-content block
//! image                   "[caption] " + rewritten attachment URL
//! content = text + ("\n" if both) + image
//! ```
//!
//! With neither part present the content is [`MISSING_CONTENT`]. System messages and
//! unsupported cards routinely have no body, so this is a sentinel, never an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::Extractor;
use crate::config::ImageRewriteConfig;
use crate::dom::DocumentTree;
use crate::error::ExtractionError;

/// Content of a message with neither text nor an image attachment
pub const MISSING_CONTENT: &str = "--ERROR: message content missing--";

/// Stands in for the URL of an image attachment whose link cannot be read
pub const IMAGE_URL_MISSING: &str = "--image url missing--";

static SIZE_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"auto=true|sz=w\d+").expect("Invalid size hint regex"));

/// Textual rewrite of attachment URLs to their full-resolution rendition
///
/// The download marker becomes the direct-serve marker, and every `auto=true` or
/// `sz=w<digits>` size hint becomes `sz=w<width>`. Token replacement only; the URL is not
/// parsed.
#[derive(Debug, Clone)]
pub struct ImageUrlRewriter {
    download_marker: String,
    serve_marker: String,
    size_replacement: String,
}

impl ImageUrlRewriter {
    pub fn new(config: &ImageRewriteConfig) -> Self {
        Self {
            download_marker: config.download_marker.clone(),
            serve_marker: config.serve_marker.clone(),
            size_replacement: format!("sz=w{}", config.width),
        }
    }

    pub fn rewrite(&self, url: &str) -> String {
        let served = if self.download_marker.is_empty() {
            url.to_string()
        } else {
            url.replace(&self.download_marker, &self.serve_marker)
        };
        SIZE_HINT.replace_all(&served, self.size_replacement.as_str()).into_owned()
    }
}

/// Normalized body plus the absences met while building it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent {
    pub content: String,
    pub issues: Vec<ExtractionError>,
}

impl Extractor {
    /// Build the normalized body of a message node
    pub fn normalize_content<T: DocumentTree + ?Sized>(&self, tree: &T, message: T::Node) -> NormalizedContent {
        let mut issues = Vec::new();

        let text = tree
            .first_descendant(message, &self.selectors.content_block)
            .map(|block| tree.inner_html(block))
            .unwrap_or_default();

        let image = match tree.first_descendant(message, &self.selectors.image) {
            Some(anchor) => {
                let (image, missing_url) = self.describe_image(tree, anchor);
                if missing_url {
                    warn!("Image attachment without a readable URL");
                    issues.push(ExtractionError::MissingImageUrl);
                }
                image
            }
            None => String::new(),
        };

        let separator = if !text.is_empty() && !image.is_empty() { "\n" } else { "" };
        let mut content = format!("{}{}{}", text, separator, image);

        if content.is_empty() {
            warn!("Message has neither text nor image content");
            issues.push(ExtractionError::MissingContent);
            content = MISSING_CONTENT.to_string();
        }

        NormalizedContent { content, issues }
    }

    /// `"[caption] url"`, the caption part omitted when empty. The flag reports a missing URL.
    fn describe_image<T: DocumentTree + ?Sized>(&self, tree: &T, anchor: T::Node) -> (String, bool) {
        let caption = tree
            .attribute(anchor, &self.attributes.caption)
            .filter(|caption| !caption.is_empty())
            .map(|caption| format!("[{}] ", caption))
            .unwrap_or_default();

        let url = tree
            .attribute(anchor, &self.attributes.href)
            .filter(|href| !href.is_empty())
            .or_else(|| {
                tree.first_descendant(anchor, &self.selectors.image_source)
                    .and_then(|img| tree.attribute(img, &self.attributes.src))
                    .filter(|src| !src.is_empty())
            });

        match url {
            Some(url) => (format!("{}{}", caption, self.rewriter.rewrite(url)), false),
            None => (format!("{}{}", caption, IMAGE_URL_MISSING), true),
        }
    }
}
