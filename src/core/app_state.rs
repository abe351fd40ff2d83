use std::sync::Arc;

use crate::core::config::{ConfigError, SearchConfig};
use crate::tools::search::fetch::ReqwestFetcher;
use crate::tools::search::{SearchOrchestrator, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<dyn SearchService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client, config: SearchConfig) -> Result<Self, ConfigError> {
        let fetcher = Arc::new(ReqwestFetcher::new(http_client));
        let orchestrator = SearchOrchestrator::new(config, fetcher)?;
        Ok(Self::with_service(Arc::new(orchestrator)))
    }

    pub fn with_service(search_service: Arc<dyn SearchService>) -> Self {
        Self { search_service }
    }
}
