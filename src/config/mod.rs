//! Configuration module for Burrow
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use burrow::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, StatusConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
