//! Burrow main entry point
//!
//! Command-line interface for the Burrow single-domain crawler.

use anyhow::Context;
use burrow::config::load_config_with_hash;
use burrow::crawler::{Crawler, HtmlLinkExtractor, WebFetcher};
use burrow::frontier::Frontier;
use burrow::ledger::{Blacklist, PageLedger};
use burrow::status::{self, AppState};
use burrow::storage::open_store;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Burrow: a single-domain mirroring web crawler
///
/// Crawls every page reachable from the seed URL on the seed's host,
/// persisting page bodies and mirroring them to a downloads tree. Interrupt
/// with Ctrl-C; pending work is checkpointed and the next invocation
/// resumes where this one stopped.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(version)]
#[command(about = "A single-domain mirroring web crawler", long_about = None)]
struct Cli {
    /// Seed URL the crawl starts from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("failed to load configuration")?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    // Startup failures below are unrecoverable and terminate the process;
    // everything after this point is logged and survived.
    let downloads_dir = PathBuf::from(&config.storage.downloads_dir);
    std::fs::create_dir_all(&downloads_dir).with_context(|| {
        format!(
            "could not create downloads directory {}",
            downloads_dir.display()
        )
    })?;

    let store = Arc::new(
        open_store(Path::new(&config.storage.database_path)).with_context(|| {
            format!("unable to open database {}", config.storage.database_path)
        })?,
    );

    let frontier = Arc::new(Frontier::restore(store.clone()).context("failed to restore frontier")?);
    let ledger = Arc::new(PageLedger::new(store));
    let blacklist = Blacklist::new();

    let fetcher = Arc::new(
        WebFetcher::new(&config.fetch.acceptable_content_types)
            .context("failed to build HTTP client")?,
    );
    let extractor = Arc::new(HtmlLinkExtractor::new());

    let crawler = Arc::new(Crawler::new(
        config.crawler.parallelism,
        fetcher,
        extractor,
        ledger.clone(),
        frontier.clone(),
        blacklist.clone(),
        downloads_dir,
    ));

    // The status endpoint runs for the lifetime of the process
    let state = Arc::new(AppState {
        ledger,
        frontier,
        blacklist,
        started_at: chrono::Utc::now(),
    });
    let bind_addr = config.status.bind_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = status::serve(&bind_addr, state).await {
            tracing::error!("Status endpoint failed: {}", e);
        }
    });

    // SIGINT/SIGTERM raise the stop signal; workers drain and the frontier
    // is checkpointed before crawl() returns.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::info!("Stop signal received, draining");
        let _ = stop_tx.send(true);
    });

    crawler.crawl(&cli.seed, stop_rx).await?;

    tracing::info!("Crawl stopped");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("burrow=info,warn"),
            1 => EnvFilter::new("burrow=debug,info"),
            2 => EnvFilter::new("burrow=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::error!("Could not install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
