//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains:
//! - The HTTP fetch collaborator (no redirects, content-type allowlist)
//! - The link extraction collaborator
//! - The downloads-tree mirror
//! - The coordinator that ties workers, frontier and ledger together

mod coordinator;
mod downloads;
mod fetcher;
mod parser;

pub use coordinator::{Crawler, Phase};
pub use downloads::{save_body, target_path};
pub use fetcher::{Fetch, FetchError, WebFetcher};
pub use parser::{ExtractLinks, HtmlLinkExtractor, ParseError};
