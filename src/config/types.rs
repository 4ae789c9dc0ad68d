use serde::Deserialize;

/// Main configuration structure for Burrow
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub status: StatusConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent workers pulling from the frontier
    pub parallelism: usize,
}

/// Fetch collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Content types worth downloading; responses declaring anything else
    /// are rejected. Matched as substrings, so "text/html" also accepts
    /// "text/html; charset=utf-8".
    #[serde(rename = "acceptable-content-types")]
    pub acceptable_content_types: Vec<String>,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Root of the filesystem mirror of downloaded pages
    #[serde(rename = "downloads-dir")]
    pub downloads_dir: String,
}

/// Status endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Address the read-only status endpoint binds to
    #[serde(rename = "bind-addr")]
    pub bind_addr: String,
}
