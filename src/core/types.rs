use serde::{Deserialize, Serialize};

/// Body of `POST /search`. A missing keyword is treated as empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keyword: String,
}

/// Query string of `GET /api/scraper`. `keyword` is optional here so a missing
/// parameter reaches the handler and is reported as invalid input.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KeywordParams {
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResponse {
    /// Caller's keyword, echoed verbatim.
    pub keyword: String,
    pub results: Vec<SearchResult>,
}

/// One normalized organic result.
///
/// Emitted results always carry a non-empty `title` and an absolute, non-empty
/// `url`; `snippet` may be empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Error body returned by the HTTP surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// A validated search keyword: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    keyword: String,
}

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            keyword: trimmed.to_string(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}
