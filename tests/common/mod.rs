#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use serp_scout::config::{FileConfig, SearchConfig};
use serp_scout::search::fetch::{FetchOutcome, Fetcher};
use serp_scout::SearchOrchestrator;

pub const API_HOST: &str = "serpapi.com";

/// In-memory fetcher: answers by host and records every request.
#[derive(Default)]
pub struct MockFetcher {
    pub api: Option<FetchOutcome>,
    pub serp: Option<FetchOutcome>,
    calls: Mutex<Vec<(Url, HeaderMap)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api(mut self, outcome: FetchOutcome) -> Self {
        self.api = Some(outcome);
        self
    }

    pub fn with_serp(mut self, outcome: FetchOutcome) -> Self {
        self.serp = Some(outcome);
        self
    }

    pub fn calls(&self) -> Vec<(Url, HeaderMap)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn api_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(u, _)| u.host_str() == Some(API_HOST))
            .count()
    }

    pub fn serp_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(u, _)| u.host_str() != Some(API_HOST))
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url, headers: &HeaderMap, _timeout: Duration) -> FetchOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), headers.clone()));
        let canned = if url.host_str() == Some(API_HOST) {
            &self.api
        } else {
            &self.serp
        };
        canned
            .clone()
            .unwrap_or_else(|| FetchOutcome::TransportError("connect: no route configured".into()))
    }
}

pub fn ok(body: &str) -> FetchOutcome {
    FetchOutcome::Success {
        status: StatusCode::OK,
        body: body.to_string(),
    }
}

pub fn http_error(status: u16, body: &str) -> FetchOutcome {
    FetchOutcome::HttpError {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
    }
}

pub fn config(api_key: Option<&str>) -> SearchConfig {
    let file = FileConfig {
        search_api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    SearchConfig::resolve_with(file, |_| None).unwrap()
}

pub fn orchestrator(api_key: Option<&str>, fetcher: Arc<MockFetcher>) -> SearchOrchestrator {
    SearchOrchestrator::new(config(api_key), fetcher).unwrap()
}

pub const API_THREE_ENTRIES: &str = r#"{
    "organic_results": [
        {"title": "Rust Programming Language", "link": "https://www.rust-lang.org/", "snippet": "Reliable and efficient software."},
        {"title": "Learn Rust", "link": "https://www.rust-lang.org/learn", "snippet_highlighted_words": ["Rust", "book"]},
        {"title": "Entry without link", "snippet": "dangling"}
    ]
}"#;

/// Primary container class absent; two wrapper anchors present.
pub const SECONDARY_ONLY_PAGE: &str = r#"
<html><body>
  <div id="rso">
    <div class="g tF2Cxc">
      <div class="yuRUbf"><a href="/url?q=https://tokio.rs/&amp;sa=U&amp;ved=abc"><h3>Tokio - An asynchronous Rust runtime</h3></a></div>
      <div class="VwiC3b">Tokio is an asynchronous runtime for Rust.</div>
    </div>
    <div class="g tF2Cxc">
      <div class="yuRUbf"><a href="https://serde.rs/"><h3>Serde</h3></a></div>
      <span class="aCOpRe">Serialization framework.</span>
    </div>
  </div>
</body></html>
"#;

pub const PRIMARY_PAGE: &str = r#"
<html><body><div id="search">
  <div class="g">
    <a href="/url?q=https://www.rust-lang.org/&amp;sa=U"><h3>Rust Programming Language</h3></a>
    <div class="VwiC3b">A language empowering everyone.</div>
  </div>
  <div class="g">
    <a href="https://www.rust-lang.org/"><h3>Rust Programming Language</h3></a>
    <div class="VwiC3b">Same result, direct link.</div>
  </div>
  <div class="g">
    <a href="https://doc.rust-lang.org/book/"><h3>The Rust Book</h3></a>
  </div>
</div></body></html>
"#;
