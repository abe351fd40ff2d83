use crate::core::error::SearchError;
use crate::types::SearchResponse;
use async_trait::async_trait;

#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError>;
}
