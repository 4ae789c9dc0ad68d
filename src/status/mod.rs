//! Read-only HTTP status endpoint
//!
//! Reports how far the crawl has progressed: visited pages, pending
//! frontier items and blacklisted links, each read straight off the owning
//! component. Strictly observational; nothing here can mutate crawl state.

use crate::frontier::Frontier;
use crate::ledger::{Blacklist, PageLedger};
use crate::CrawlError;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Handles the status endpoint reads its counts from
pub struct AppState {
    pub ledger: Arc<PageLedger>,
    pub frontier: Arc<Frontier>,
    pub blacklist: Blacklist,
    pub started_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    /// Pages stored in the visited ledger
    pub visited: u64,
    /// URLs waiting in the frontier
    pub pending: usize,
    /// URLs excluded for this run
    pub blacklisted: usize,
    /// When this process started
    pub started_at: String,
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        visited: state.ledger.size(),
        pending: state.frontier.size(),
        blacklisted: state.blacklist.len(),
        started_at: state.started_at.to_rfc3339(),
    })
}

/// Builds the status router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(get_status)).with_state(state)
}

/// Binds `addr` and serves status requests until the process exits
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), CrawlError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Status endpoint listening on {}", addr);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| CrawlError::Status(e.to_string()))
}
