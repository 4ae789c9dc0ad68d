//! URL normalization and domain scoping
//!
//! Pure functions that decide which discovered links stay inside the crawl:
//! relative links are resolved against the originating page, and anything
//! pointing at another host or scheme is rejected for blacklisting.

mod scope;

pub use scope::{filter_links, normalize_candidate, FilterOutcome, RejectReason};
