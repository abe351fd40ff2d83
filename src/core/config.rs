use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ---------------------------------------------------------------------------
// FileConfig — file-based config loader (serp-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "SERP_SCOUT_CONFIG";
pub const ENV_SERPAPI_KEY: &str = "SERPAPI_KEY";
pub const ENV_TIMEOUT_MS: &str = "SEARCH_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "SEARCH_USER_AGENT";
pub const ENV_ACCEPT_LANGUAGE: &str = "SEARCH_ACCEPT_LANGUAGE";
pub const ENV_BASE_URL: &str = "SEARCH_BASE_URL";
pub const ENV_SERPAPI_ENDPOINT: &str = "SERPAPI_ENDPOINT";
pub const ENV_HL: &str = "SEARCH_HL";
pub const ENV_GL: &str = "SEARCH_GL";
pub const ENV_NUM: &str = "SEARCH_NUM";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "HTTP_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.google.com/search";
pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid URL for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// SERP markup description. Provider class names drift, so these live in
/// config rather than in code; the defaults match Google's desktop layout.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SerpMarkup {
    /// Primary strategy: one element per organic result.
    pub primary_container: String,
    /// Secondary strategy: anchors wrapping the result heading.
    pub secondary_anchor: String,
    /// Ancestor searched for a snippet when the secondary strategy matches.
    pub result_container: String,
    pub heading: String,
    /// Any of these may hold the snippet; the first in document order wins.
    pub snippet: Vec<String>,
    /// Path of same-site redirect links, e.g. `/url?q=<target>&sa=...`.
    pub redirect_path: String,
    /// Query parameter carrying the redirect target.
    pub redirect_param: String,
}

impl Default for SerpMarkup {
    fn default() -> Self {
        Self {
            primary_container: "#search .g".to_string(),
            secondary_anchor: "div.yuRUbf > a".to_string(),
            result_container: ".g".to_string(),
            heading: "h3".to_string(),
            snippet: vec!["div.VwiC3b".to_string(), "span.aCOpRe".to_string()],
            redirect_path: "/url".to_string(),
            redirect_param: "q".to_string(),
        }
    }
}

/// Raw `serp-scout.json` contents. Every field is optional.
#[derive(Deserialize, Default, Clone, Debug)]
pub struct FileConfig {
    /// SerpAPI key. Never logged.
    pub search_api_key: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub search_base_url: Option<String>,
    pub api_endpoint: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    pub num: Option<u32>,
    #[serde(default)]
    pub markup: Option<SerpMarkup>,
}

/// Resolved, validated configuration handed to the orchestrator at construction.
#[derive(Clone)]
pub struct SearchConfig {
    /// Enables the structured-API path when present.
    pub search_api_key: Option<String>,
    pub request_timeout: Duration,
    /// Shared HTTP client's connect bound; `request_timeout` still caps the whole request.
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub search_base_url: Url,
    pub api_endpoint: Url,
    pub hl: String,
    pub gl: String,
    pub num: u32,
    pub markup: SerpMarkup,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key_configured", &self.search_api_key.is_some())
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("accept_language", &self.accept_language)
            .field("search_base_url", &self.search_base_url.as_str())
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("hl", &self.hl)
            .field("gl", &self.gl)
            .field("num", &self.num)
            .finish()
    }
}

impl SearchConfig {
    /// Resolve against the process environment.
    pub fn resolve(file: FileConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(file, |k| std::env::var(k).ok())
    }

    /// Each field: JSON file → env var → built-in default. Blank values count as unset.
    pub fn resolve_with<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let pick = |field: Option<String>, key: &str| {
            field
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| env(key))
        };

        let search_api_key = pick(file.search_api_key, ENV_SERPAPI_KEY);

        let timeout_ms = file
            .request_timeout_ms
            .or_else(|| env(ENV_TIMEOUT_MS).and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("request_timeout_ms"));
        }

        let connect_secs = file
            .connect_timeout_secs
            .or_else(|| env(ENV_CONNECT_TIMEOUT_SECS).and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        if connect_secs == 0 {
            return Err(ConfigError::ZeroTimeout("connect_timeout_secs"));
        }

        let user_agent = pick(file.user_agent, ENV_USER_AGENT)
            .unwrap_or_else(|| crate::antibot::DEFAULT_USER_AGENT.to_string());
        let accept_language = pick(file.accept_language, ENV_ACCEPT_LANGUAGE)
            .unwrap_or_else(|| DEFAULT_ACCEPT_LANGUAGE.to_string());

        let base = pick(file.search_base_url, ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string());
        let search_base_url = Url::parse(&base).map_err(|source| ConfigError::InvalidUrl {
            field: "search_base_url",
            source,
        })?;

        let endpoint = pick(file.api_endpoint, ENV_SERPAPI_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_SERPAPI_ENDPOINT.to_string());
        let api_endpoint = Url::parse(&endpoint).map_err(|source| ConfigError::InvalidUrl {
            field: "api_endpoint",
            source,
        })?;

        let hl = pick(file.hl, ENV_HL).unwrap_or_else(|| "en".to_string());
        let gl = pick(file.gl, ENV_GL).unwrap_or_else(|| "us".to_string());
        let num = file
            .num
            .or_else(|| env(ENV_NUM).and_then(|v| v.parse().ok()))
            .unwrap_or(10);

        Ok(Self {
            search_api_key,
            request_timeout: Duration::from_millis(timeout_ms),
            connect_timeout: Duration::from_secs(connect_secs),
            user_agent,
            accept_language,
            search_base_url,
            api_endpoint,
            hl,
            gl,
            num,
            markup: file.markup.unwrap_or_default(),
        })
    }
}

/// Load `serp-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `SERP_SCOUT_CONFIG` env var path
/// 2. `./serp-scout.json`
/// 3. `../serp-scout.json`
///
/// Missing file → `FileConfig::default()` (all env-var fallbacks apply).
/// Parse error → log a warning, return `FileConfig::default()`.
pub fn load_file_config() -> FileConfig {
    let mut candidates = vec![
        PathBuf::from("serp-scout.json"),
        PathBuf::from("../serp-scout.json"),
    ];
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match serde_json::from_str::<FileConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("serp-scout.json loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "serp-scout.json parse error at {}: {} (using defaults)",
                    path.display(),
                    e
                );
                FileConfig::default()
            }
        };
    }

    FileConfig::default()
}
