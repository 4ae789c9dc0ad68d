//! Burrow: a single-domain mirroring web crawler
//!
//! Given a seed URL, Burrow walks every reachable page on the same host,
//! persists each page body durably, mirrors it to a downloads tree, and
//! schedules newly discovered same-domain links for future visits. The
//! frontier survives process restarts; pages already visited are never
//! fetched again within the lifetime of the database.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod ledger;
pub mod status;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Burrow operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Link extraction error for {url}: {source}")]
    Parse {
        url: String,
        source: crawler::ParseError,
    },

    #[error("Invalid seed URL {url}: {source}")]
    InvalidSeed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Seed URL {0} has no host component")]
    SeedWithoutHost(String),

    #[error("Status server error: {0}")]
    Status(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, ExtractLinks, Fetch};
pub use frontier::Frontier;
pub use ledger::{Blacklist, PageLedger};
pub use crate::url::{filter_links, FilterOutcome, RejectReason};
