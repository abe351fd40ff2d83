//! Browser headers for outbound search requests.
//! Public search engines block the default client headers, so every request
//! presents itself as a desktop browser.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT,
};
use tracing::warn;

use crate::core::config::SearchConfig;

/// Desktop Chrome on Windows; used when no user agent is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pre-accepted consent cookie; skips the EU consent interstitial.
pub const CONSENT_COOKIE: &str = "CONSENT=YES+";

/// Headers for fetching a SERP page.
pub fn serp_headers(config: &SearchConfig) -> HeaderMap {
    let referer = config
        .search_base_url
        .join("/")
        .map(|u| u.to_string())
        .unwrap_or_default();

    build_headers(&[
        (USER_AGENT, config.user_agent.as_str()),
        (ACCEPT, "text/html,application/xhtml+xml"),
        (ACCEPT_LANGUAGE, config.accept_language.as_str()),
        (REFERER, referer.as_str()),
        (COOKIE, CONSENT_COOKIE),
    ])
}

/// Headers for the structured JSON API.
pub fn api_headers(config: &SearchConfig) -> HeaderMap {
    build_headers(&[
        (USER_AGENT, config.user_agent.as_str()),
        (ACCEPT, "application/json"),
        (ACCEPT_LANGUAGE, config.accept_language.as_str()),
    ])
}

fn build_headers(pairs: &[(HeaderName, &str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        if value.is_empty() {
            continue;
        }
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name.clone(), v);
            }
            Err(_) => warn!("Skipping header {} with invalid value", name),
        }
    }
    headers
}
