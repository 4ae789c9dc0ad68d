//! Crawl orchestration
//!
//! The coordinator drives the whole crawl: it seeds the frontier on a first
//! run, keeps a bounded pool of workers pulling from it, and runs the
//! shutdown protocol when the stop signal arrives. Workers synchronize only
//! through the frontier, the visited ledger and the blacklist; there is no
//! other shared state.

use crate::crawler::downloads;
use crate::crawler::{ExtractLinks, Fetch};
use crate::frontier::{Frontier, FrontierError};
use crate::ledger::{Blacklist, PageLedger};
use crate::url::filter_links;
use crate::{CrawlError, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use url::Url;

/// How long a worker sleeps before re-polling an empty frontier
const EMPTY_BACKOFF: Duration = Duration::from_millis(500);

/// Phases of a crawl run
///
/// `Running` lasts until the external stop signal; an empty frontier means
/// idle polling, not completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Seeding,
    Running,
    Draining,
    Stopped,
}

/// The crawl orchestrator
///
/// Owns the collaborators and shared components; `crawl` consumes an `Arc`
/// of it so every worker task can hold a handle.
pub struct Crawler {
    parallelism: usize,
    fetcher: Arc<dyn Fetch>,
    extractor: Arc<dyn ExtractLinks>,
    ledger: Arc<PageLedger>,
    frontier: Arc<Frontier>,
    blacklist: Blacklist,
    downloads_dir: PathBuf,
}

impl Crawler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        parallelism: usize,
        fetcher: Arc<dyn Fetch>,
        extractor: Arc<dyn ExtractLinks>,
        ledger: Arc<PageLedger>,
        frontier: Arc<Frontier>,
        blacklist: Blacklist,
        downloads_dir: PathBuf,
    ) -> Self {
        tracing::debug!("Crawl phase: {:?}", Phase::Idle);
        Self {
            parallelism,
            fetcher,
            extractor,
            ledger,
            frontier,
            blacklist,
            downloads_dir,
        }
    }

    /// Runs a crawl session rooted at `seed` until the stop signal arrives
    ///
    /// Seeds the frontier when it is empty (first run); a non-empty frontier
    /// means a resumed session and the seed only contributes its host as the
    /// crawl domain. Returns after the drain protocol has checkpointed the
    /// frontier.
    pub async fn crawl(self: Arc<Self>, seed: &str, stop: watch::Receiver<bool>) -> Result<()> {
        let seed_url = Url::parse(seed).map_err(|source| CrawlError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;
        let host: Arc<str> = seed_url
            .host_str()
            .ok_or_else(|| CrawlError::SeedWithoutHost(seed.to_string()))?
            .into();

        tracing::debug!("Crawl phase: {:?}", Phase::Seeding);
        if self.frontier.size() == 0 {
            // No postponed work, so this is a first run
            self.frontier.push(seed)?;
            tracing::info!("Seeded frontier with {}", seed);
        } else {
            tracing::info!(
                "Resuming crawl with {} pending frontier items",
                self.frontier.size()
            );
        }

        tracing::info!(
            "Crawl phase: {:?} ({} workers, domain {})",
            Phase::Running,
            self.parallelism,
            host
        );
        let mut workers = JoinSet::new();
        for id in 0..self.parallelism {
            workers.spawn(Arc::clone(&self).worker(id, Arc::clone(&host), stop.clone()));
        }

        // Workers exit only once the stop signal is raised
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task panicked: {}", e);
            }
        }

        tracing::info!("Crawl phase: {:?}", Phase::Draining);
        self.frontier.save_state()?;
        tracing::info!(
            "Frontier checkpointed with {} pending items",
            self.frontier.size()
        );

        tracing::debug!("Crawl phase: {:?}", Phase::Stopped);
        Ok(())
    }

    /// A single worker's pull-dispatch-evaluate loop
    async fn worker(self: Arc<Self>, id: usize, host: Arc<str>, mut stop: watch::Receiver<bool>) {
        tracing::debug!("Worker {} started", id);

        loop {
            if *stop.borrow() {
                break;
            }

            let url = match self.frontier.pull() {
                Ok(url) => url,
                Err(FrontierError::Empty) => {
                    // No blocking pop exists; poll with a short backoff, but
                    // wake immediately when the stop signal flips.
                    tokio::select! {
                        _ = tokio::time::sleep(EMPTY_BACKOFF) => {}
                        changed = stop.changed() => {
                            if changed.is_err() {
                                // Sender gone without a signal; nothing can
                                // stop us later, so stop now
                                break;
                            }
                        }
                    }
                    continue;
                }
                Err(e) => {
                    tracing::error!("Frontier pull failed: {}", e);
                    tokio::time::sleep(EMPTY_BACKOFF).await;
                    continue;
                }
            };

            // Defensive re-check: a resumed frontier may hold items from a
            // session whose seed pointed at a different domain.
            let origin = match Url::parse(&url) {
                Ok(parsed) if parsed.host_str() == Some(host.as_ref()) => parsed,
                _ => {
                    tracing::debug!("Dropping out-of-domain frontier item {}", url);
                    self.blacklist.add(&url);
                    continue;
                }
            };

            // A racing worker may have finished this URL between the dedup
            // check at push time and now.
            if self.ledger.is_visited(&url) {
                continue;
            }

            match self.visit(&url, &origin).await {
                Ok(discovered) => {
                    tracing::info!("Visited {} ({} links queued)", url, discovered);
                }
                Err(e @ (CrawlError::Fetch { .. } | CrawlError::Parse { .. })) => {
                    tracing::warn!("{}", e);
                    self.blacklist.add(&url);
                }
                Err(e) => {
                    // Persistence failure: the item's state is ambiguous and
                    // will be re-derived if the URL resurfaces.
                    tracing::error!("Error processing {}: {}", url, e);
                }
            }
        }

        tracing::debug!("Worker {} stopped", id);
    }

    /// Fetches one page, persists it, and queues its in-scope links
    ///
    /// Returns the number of links pushed to the frontier.
    async fn visit(&self, url: &str, origin: &Url) -> Result<usize> {
        let body = self
            .fetcher
            .download(url)
            .await
            .map_err(|source| CrawlError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let raw_links = self
            .extractor
            .parse_links(&body)
            .map_err(|source| CrawlError::Parse {
                url: url.to_string(),
                source,
            })?;

        if let Err(e) = downloads::save_body(&self.downloads_dir, origin, &body).await {
            tracing::warn!(
                "Could not mirror {} under {}: {}",
                url,
                self.downloads_dir.display(),
                e
            );
        }

        // The body must be durably recorded before any discovered link is
        // queued; a crash between the two re-fetches this page at worst.
        self.ledger.save_by_key(url, &body)?;

        let outcome = filter_links(origin, &raw_links);
        for (link, reason) in &outcome.rejected {
            tracing::debug!("Blacklisting {}: {}", link, reason);
            self.blacklist.add(link);
        }

        let mut seen = HashSet::new();
        let mut pushed = 0;
        for link in &outcome.accepted {
            if !seen.insert(link.as_str()) {
                continue;
            }
            if self.ledger.is_visited(link) || self.blacklist.contains(link) {
                continue;
            }
            self.frontier.push(link)?;
            pushed += 1;
        }

        Ok(pushed)
    }
}
