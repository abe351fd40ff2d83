use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::core::config::SearchConfig;
use crate::tools::search::fetch::{FetchOutcome, Fetcher};
use crate::types::SearchResult;

/// Structured-API failure. Distinct from an empty result, which is `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    snippet_highlighted_words: Option<Vec<String>>,
}

impl OrganicResult {
    fn into_result(self) -> Option<SearchResult> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.link.filter(|l| !l.trim().is_empty())?;
        let snippet = self
            .snippet
            .filter(|s| !s.is_empty())
            .or_else(|| self.snippet_highlighted_words.map(|w| w.join(" ")))
            .unwrap_or_default();
        Some(SearchResult {
            title,
            url,
            snippet,
        })
    }
}

/// `GET {endpoint}?engine=google&q=..&hl=..&gl=..&num=..&api_key=..`
pub fn build_api_url(config: &SearchConfig, keyword: &str, api_key: &str) -> Url {
    let mut url = config.api_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("engine", "google")
        .append_pair("q", keyword)
        .append_pair("hl", &config.hl)
        .append_pair("gl", &config.gl)
        .append_pair("num", &config.num.to_string())
        .append_pair("api_key", api_key);
    url
}

/// Maps `organic_results[]` in provider order. A missing or non-array
/// `organic_results` is an empty result; malformed entries are skipped.
pub fn parse_response(body: &str) -> Result<Vec<SearchResult>, ApiError> {
    let mut value: serde_json::Value = serde_json::from_str(body)?;

    if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
        debug!("SerpAPI reported: {}", err);
    }

    let entries = match value.get_mut("organic_results").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<OrganicResult>(entry).ok())
        .filter_map(OrganicResult::into_result)
        .collect())
}

/// One request to the structured results API.
pub async fn query_api(
    fetcher: &dyn Fetcher,
    config: &SearchConfig,
    keyword: &str,
    api_key: &str,
) -> Result<Vec<SearchResult>, ApiError> {
    let url = build_api_url(config, keyword, api_key);
    let headers = crate::antibot::api_headers(config);

    match fetcher.fetch(&url, &headers, config.request_timeout).await {
        FetchOutcome::Success { body, .. } => parse_response(&body),
        FetchOutcome::HttpError { status, .. } => Err(ApiError::Status(status)),
        FetchOutcome::TransportError(cause) => Err(ApiError::Transport(cause)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FileConfig;

    #[test]
    fn maps_entries_and_skips_incomplete_ones() {
        let body = r#"{
            "search_metadata": {"status": "Success"},
            "organic_results": [
                {"position": 1, "title": "Rust", "link": "https://www.rust-lang.org/", "snippet": "A language"},
                {"position": 2, "title": "Rust Book", "link": "https://doc.rust-lang.org/book/",
                 "snippet_highlighted_words": ["Rust", "book"]},
                {"position": 3, "title": "No link here"},
                {"position": 4, "link": "https://no-title.example/"},
                {"position": 5, "title": 42, "link": "https://bad-type.example/"}
            ]
        }"#;
        let results = parse_response(body).unwrap();
        assert_eq!(
            results,
            vec![
                SearchResult::new("Rust", "https://www.rust-lang.org/", "A language"),
                SearchResult::new("Rust Book", "https://doc.rust-lang.org/book/", "Rust book"),
            ]
        );
    }

    #[test]
    fn empty_snippet_falls_back_to_highlighted_words() {
        let body = r#"{"organic_results": [
            {"title": "T", "link": "https://t.example/", "snippet": "", "snippet_highlighted_words": ["a", "b"]},
            {"title": "U", "link": "https://u.example/"}
        ]}"#;
        let results = parse_response(body).unwrap();
        assert_eq!(results[0].snippet, "a b");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn missing_organic_results_is_empty_success() {
        assert!(parse_response(r#"{"error": "Google hasn't returned any results for this query."}"#)
            .unwrap()
            .is_empty());
        assert!(parse_response(r#"{"organic_results": "nope"}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn api_url_carries_locale_and_key() {
        let config = SearchConfig::resolve_with(FileConfig::default(), |_| None).unwrap();
        let url = build_api_url(&config, "rust & tokio", "k3y");
        assert_eq!(url.host_str(), Some("serpapi.com"));
        assert_eq!(url.path(), "/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("engine".into(), "google".into())));
        assert!(pairs.contains(&("q".into(), "rust & tokio".into())));
        assert!(pairs.contains(&("hl".into(), "en".into())));
        assert!(pairs.contains(&("gl".into(), "us".into())));
        assert!(pairs.contains(&("num".into(), "10".into())));
        assert!(pairs.contains(&("api_key".into(), "k3y".into())));
    }
}
