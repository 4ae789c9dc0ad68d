use thiserror::Error;
use url::Url;

/// Why a candidate link was rejected
///
/// Every reason is permanent: the caller blacklists the link and it is never
/// retried within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("does not parse as a URL")]
    Malformed,

    #[error("host is outside the crawl domain")]
    CrossDomain,

    #[error("scheme differs from the originating page")]
    SchemeMismatch,
}

/// Result of filtering one page's worth of extracted links
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Fully-qualified links to consider for the frontier, input order kept
    pub accepted: Vec<String>,

    /// Links to be blacklisted, paired with the reason
    pub rejected: Vec<(String, RejectReason)>,
}

/// Normalizes a single candidate link against its originating page
///
/// Rules, applied in order:
///
/// 1. A candidate that parses as neither an absolute URL nor a reference
///    resolvable against the origin is malformed.
/// 2. A host, when present, must equal the origin's host; when absent it is
///    inherited from the origin.
/// 3. A scheme, when present, must equal the origin's scheme (`http` and
///    `https` are different origins); when absent it is inherited.
///
/// An already-absolute, in-scope candidate passes through unchanged;
/// relative candidates come back in their fully-qualified form.
pub fn normalize_candidate(origin: &Url, link: &str) -> Result<String, RejectReason> {
    match Url::parse(link) {
        Ok(parsed) => {
            if let Some(host) = parsed.host_str() {
                if Some(host) != origin.host_str() {
                    return Err(RejectReason::CrossDomain);
                }
            }
            if parsed.scheme() != origin.scheme() {
                return Err(RejectReason::SchemeMismatch);
            }
            if parsed.host_str().is_none() {
                // same scheme but no authority (cannot happen for http/https)
                return Err(RejectReason::Malformed);
            }
            Ok(link.to_string())
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Joining inherits the origin's scheme and, unless the reference
            // is protocol-relative, its host as well.
            let resolved = origin.join(link).map_err(|_| RejectReason::Malformed)?;
            if resolved.host_str() != origin.host_str() {
                return Err(RejectReason::CrossDomain);
            }
            Ok(resolved.into())
        }
        Err(_) => Err(RejectReason::Malformed),
    }
}

/// Filters a page's extracted links down to those eligible for the frontier
///
/// Accepted links preserve input order; rejects are reported back for the
/// caller to blacklist. This function has no side effects of its own.
pub fn filter_links(origin: &Url, candidates: &[String]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for candidate in candidates {
        match normalize_candidate(origin, candidate) {
            Ok(normalized) => outcome.accepted.push(normalized),
            Err(reason) => outcome.rejected.push((candidate.clone(), reason)),
        }
    }

    outcome
}
