//! Link extraction collaborator
//!
//! Scans raw page bytes for hyperlink references and returns them verbatim,
//! in document order. Normalization and domain scoping happen later, in the
//! `url` module; this parser only reports what the markup says.

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors produced by link extraction
///
/// html5ever recovers from malformed markup rather than failing, so in
/// practice extraction always succeeds; the error arm exists for the
/// collaborator contract and any future backend that can fail mid-stream.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("HTML token stream failed: {0}")]
    TokenStream(String),
}

/// Contract the orchestrator expects from the link extractor
pub trait ExtractLinks: Send + Sync {
    /// Returns the raw hyperlink strings found in a page body
    fn parse_links(&self, body: &[u8]) -> Result<Vec<String>, ParseError>;
}

/// Extractor that collects `href`/`src` values from `<a>`, `<link>` and
/// `<script>` elements
#[derive(Debug, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractLinks for HtmlLinkExtractor {
    fn parse_links(&self, body: &[u8]) -> Result<Vec<String>, ParseError> {
        // Non-UTF-8 bytes decode lossily; the replacement characters can
        // only appear in text nodes we do not read from.
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let mut links = Vec::new();

        // A single selector list keeps document order across the three tags
        if let Ok(selector) = Selector::parse("a[href], link[href], script[src]") {
            for element in document.select(&selector) {
                let value = element
                    .value()
                    .attr("href")
                    .or_else(|| element.value().attr("src"));
                if let Some(value) = value {
                    links.push(value.to_string());
                }
            }
        }

        Ok(links)
    }
}
