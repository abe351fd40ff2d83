pub mod engines;
pub mod extract;
pub mod fetch;
pub mod normalize;
mod service;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::{ConfigError, SearchConfig};
use crate::core::error::SearchError;
use crate::types::{Query, SearchResponse, SearchResult};
use engines::{detect_block_page, detect_block_reason, google, is_rate_limit_status, serpapi};
use extract::{CompiledMarkup, ExtractionStrategy};
use fetch::{FetchOutcome, Fetcher};
use normalize::{Normalizer, RedirectRule};

pub use service::SearchService;

/// Structured API first (when configured), SERP HTML otherwise.
///
/// Holds only immutable state; one instance serves any number of concurrent
/// queries.
pub struct SearchOrchestrator {
    config: Arc<SearchConfig>,
    fetcher: Arc<dyn Fetcher>,
    markup: Arc<CompiledMarkup>,
    normalizer: Normalizer,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("config", &self.config)
            .finish()
    }
}

impl SearchOrchestrator {
    /// Compiles the configured selectors; an invalid one fails here, not per request.
    pub fn new(config: SearchConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        let markup = CompiledMarkup::compile(&config.markup)?;
        let normalizer = Normalizer::new(RedirectRule::from_config(&config));
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            markup: Arc::new(markup),
            normalizer,
        })
    }

    /// At most one API call and at most one SERP fetch per invocation. A
    /// successful API answer, even an empty one, skips the SERP entirely.
    pub async fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError> {
        let query = Query::parse(keyword).ok_or(SearchError::InvalidInput)?;

        if let Some(api_key) = self.config.search_api_key.as_deref() {
            match serpapi::query_api(self.fetcher.as_ref(), &self.config, query.keyword(), api_key)
                .await
            {
                Ok(raw) => {
                    let results = self.normalizer.normalize(raw);
                    info!(
                        "search {:?}: {} results via structured API",
                        query.keyword(),
                        results.len()
                    );
                    return Ok(SearchResponse {
                        keyword: keyword.to_string(),
                        results,
                    });
                }
                Err(e) => warn!("SerpAPI failed, falling back to HTML scraping: {}", e),
            }
        }

        let results = self.search_html(&query).await?;
        info!(
            "search {:?}: {} results via SERP HTML",
            query.keyword(),
            results.len()
        );
        Ok(SearchResponse {
            keyword: keyword.to_string(),
            results,
        })
    }

    async fn search_html(&self, query: &Query) -> Result<Vec<SearchResult>, SearchError> {
        let body = match google::fetch_serp(self.fetcher.as_ref(), &self.config, query.keyword())
            .await
        {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::HttpError { status, body } if is_rate_limit_status(status) => {
                let reason = detect_block_page(&body);
                warn!("SERP rate-limited: HTTP {} ({:?})", status, reason);
                return Err(SearchError::UpstreamRateLimited { status, reason });
            }
            FetchOutcome::HttpError { status, body } => {
                let reason = detect_block_reason(status, &body);
                warn!("SERP fetch failed: HTTP {} ({:?})", status, reason);
                return Err(SearchError::UpstreamUnavailable(format!("HTTP {}", status)));
            }
            FetchOutcome::TransportError(cause) => {
                warn!("SERP fetch failed: {}", cause);
                return Err(SearchError::UpstreamUnavailable(cause));
            }
        };

        // html5ever parsing is CPU-bound; a panic there must not take the caller down.
        let markup = Arc::clone(&self.markup);
        let (matched, raw, block_reason) = tokio::task::spawn_blocking(move || {
            match extract::extract_with_strategy(&body, &markup) {
                Some((strategy, raw)) => (Some(strategy), raw, None),
                None => (None, Vec::new(), detect_block_page(&body)),
            }
        })
        .await
        .map_err(|e| SearchError::UpstreamUnavailable(format!("extraction failed: {}", e)))?;

        match matched {
            Some(strategy) => debug!(
                "{} candidates from {} strategy",
                raw.len(),
                strategy.name()
            ),
            None => match block_reason {
                Some(reason) => warn!("SERP yielded no results; page looks blocked ({})", reason),
                None => debug!(
                    "no strategy matched ({} tried)",
                    ExtractionStrategy::CASCADE.len()
                ),
            },
        }

        Ok(self.normalizer.normalize(raw))
    }
}

#[async_trait::async_trait]
impl SearchService for SearchOrchestrator {
    async fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError> {
        SearchOrchestrator::search(self, keyword).await
    }
}
