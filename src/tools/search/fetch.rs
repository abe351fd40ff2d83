use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Result of one outbound request. Request-scoped; never cached.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success { status: StatusCode, body: String },
    /// Connection, DNS, TLS, timeout or body-read failure.
    TransportError(String),
    /// Any non-2xx answer. The body is kept for block-page diagnostics.
    HttpError { status: StatusCode, body: String },
}

/// Outbound HTTP GET. Exactly one network call per `fetch`, no internal retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, headers: &HeaderMap, timeout: Duration) -> FetchOutcome;
}

/// [`Fetcher`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url, headers: &HeaderMap, timeout: Duration) -> FetchOutcome {
        let resp = match self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .timeout(timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::TransportError(describe_transport_error(e)),
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            // A truncated error page is still an HTTP error; a truncated 2xx is not usable.
            Err(e) if status.is_success() => {
                return FetchOutcome::TransportError(describe_transport_error(e))
            }
            Err(_) => String::new(),
        };

        debug!(
            "GET {} -> {} ({} bytes)",
            url.host_str().unwrap_or_default(),
            status,
            body.len()
        );

        if status.is_success() {
            FetchOutcome::Success { status, body }
        } else {
            FetchOutcome::HttpError { status, body }
        }
    }
}

fn describe_transport_error(e: reqwest::Error) -> String {
    // Strip the URL: API requests carry the key in the query string.
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_body() || e.is_decode() {
        "body"
    } else {
        "request"
    };
    format!("{}: {}", kind, e.without_url())
}
