use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::core::config::SearchConfig;
use crate::types::SearchResult;

/// Same-site redirect shape, e.g. `/url?q=<target>&sa=...` on the SERP host.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    base: Url,
    path: String,
    param: String,
}

impl RedirectRule {
    pub fn new(base: Url, path: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            base,
            path: path.into(),
            param: param.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.search_base_url.clone(),
            config.markup.redirect_path.clone(),
            config.markup.redirect_param.clone(),
        )
    }

    /// `Ok(Some(target))` when `href` is a redirect wrapper with a non-empty
    /// target, `Ok(None)` when it is an ordinary link.
    pub fn unwrap_target(&self, href: &str) -> Result<Option<String>, url::ParseError> {
        let url = self.base.join(href)?;
        if !same_site(&url, &self.base) || url.path() != self.path {
            return Ok(None);
        }
        Ok(url
            .query_pairs()
            .find(|(k, _)| k == self.param.as_str())
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// Fully unwrapped, absolute form of `href`. Anything that fails to parse
    /// is returned unchanged.
    ///
    /// A target is decoded out of its wrapper's query, so every step is
    /// strictly shorter; a target that is not stops the loop.
    pub fn resolve(&self, href: &str) -> String {
        let mut current = href.trim().to_string();
        loop {
            match self.unwrap_target(&current) {
                Ok(Some(target)) if target.len() < current.len() => current = target,
                Ok(Some(target)) => {
                    debug!("Redirect target {:?} did not shrink, stopping", target);
                    break;
                }
                Ok(None) => break,
                Err(e) => {
                    debug!("Keeping unparseable href {:?}: {}", current, e);
                    break;
                }
            }
        }
        self.absolutize(current)
    }

    fn absolutize(&self, href: String) -> String {
        match Url::parse(&href) {
            Ok(_) => href,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base
                .join(&href)
                .map(|u| u.to_string())
                .unwrap_or(href),
            Err(_) => href,
        }
    }
}

fn same_site(a: &Url, b: &Url) -> bool {
    let strip = |u: &Url| {
        u.host_str()
            .map(|h| h.trim_start_matches("www.").to_ascii_lowercase())
    };
    strip(a).is_some() && strip(a) == strip(b)
}

/// Cleans raw candidates into the output contract.
#[derive(Debug, Clone)]
pub struct Normalizer {
    redirect: RedirectRule,
}

impl Normalizer {
    pub fn new(redirect: RedirectRule) -> Self {
        Self { redirect }
    }

    /// Trim → unwrap redirects → drop incomplete → dedup by `(title, url)`.
    /// Order of first occurrences is preserved. Idempotent.
    pub fn normalize(&self, raw: Vec<SearchResult>) -> Vec<SearchResult> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(raw.len());

        for r in raw {
            let title = r.title.trim().to_string();
            let snippet = r.snippet.trim().to_string();
            let url = r.url.trim();
            let url = if url.is_empty() {
                String::new()
            } else {
                self.redirect.resolve(url)
            };

            if title.is_empty() || url.is_empty() {
                continue;
            }
            if !seen.insert((title.clone(), url.clone())) {
                continue;
            }
            out.push(SearchResult {
                title,
                url,
                snippet,
            });
        }

        out
    }
}
