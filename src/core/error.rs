use reqwest::StatusCode;
use thiserror::Error;

/// Failure classes surfaced by [`crate::search::SearchOrchestrator::search`].
///
/// "No results" is not represented here: an empty result list is a successful
/// response.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("keyword is empty")]
    InvalidInput,

    /// Upstream answered 429 or 503. The caller may retry with backoff.
    #[error("upstream rate-limited (HTTP {status})")]
    UpstreamRateLimited {
        status: StatusCode,
        /// Block-page label detected in the response body, if any.
        reason: Option<String>,
    },

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl SearchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::UpstreamRateLimited { .. })
    }

    /// Stable machine-readable code for the boundary operation.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::InvalidInput => "INVALID_INPUT",
            SearchError::UpstreamRateLimited { .. } => "RATE_LIMITED",
            SearchError::UpstreamUnavailable(_) => "FETCH_FAILED",
        }
    }
}
