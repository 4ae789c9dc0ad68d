//! Filesystem mirror of fetched pages
//!
//! Besides the durable ledger, every fetched body is written to a
//! human-browsable tree: `<root>/<host>/<url-path>/<basename>`, with
//! `index.html` standing in when the URL path carries no basename.

use std::path::{Path, PathBuf};
use url::Url;

/// Derives the mirror path for a URL, or `None` when the URL has no host
pub fn target_path(root: &Path, url: &Url) -> Option<PathBuf> {
    let host = url.host_str()?;
    let url_path = url.path();

    let basename = Path::new(url_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("index.html");

    Some(
        root.join(host)
            .join(url_path.trim_start_matches('/'))
            .join(basename),
    )
}

/// Writes a fetched body into the mirror tree, creating directories as
/// needed. Failures here are an inconvenience, not a crawl error; the
/// caller logs and moves on.
pub async fn save_body(root: &Path, url: &Url, body: &[u8]) -> std::io::Result<PathBuf> {
    let path = target_path(root, url).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "URL has no host")
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, body).await?;

    Ok(path)
}
