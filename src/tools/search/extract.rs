//! SERP markup extraction.
//!
//! Result pages drift between layouts and locales, so extraction is a cascade of
//! independent strategies, each more permissive than the last. The first
//! strategy that yields any candidate wins; strategies never fail, they only
//! match nothing.

use scraper::{ElementRef, Html, Selector};

use crate::core::config::{ConfigError, SerpMarkup};
use crate::types::SearchResult;

/// [`SerpMarkup`] with every selector parsed. Immutable, shared read-only
/// across requests.
#[derive(Debug)]
pub struct CompiledMarkup {
    primary_container: Selector,
    secondary_anchor: Selector,
    result_container: Selector,
    heading: Selector,
    snippet: Option<Selector>,
    anchor: Selector,
}

impl CompiledMarkup {
    pub fn compile(markup: &SerpMarkup) -> Result<Self, ConfigError> {
        let snippet = if markup.snippet.is_empty() {
            None
        } else {
            Some(parse_selector(&markup.snippet.join(", "))?)
        };

        Ok(Self {
            primary_container: parse_selector(&markup.primary_container)?,
            secondary_anchor: parse_selector(&markup.secondary_anchor)?,
            result_container: parse_selector(&markup.result_container)?,
            heading: parse_selector(&markup.heading)?,
            snippet,
            anchor: parse_selector("a")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Extraction rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Result containers; heading → title, enclosing anchor → url, snippet class → snippet.
    Primary,
    /// Wrapper anchors around the heading; snippet from the nearest result container.
    Secondary,
    /// Any anchor containing a heading. No snippet.
    LastResort,
}

impl ExtractionStrategy {
    pub const CASCADE: [ExtractionStrategy; 3] = [
        ExtractionStrategy::Primary,
        ExtractionStrategy::Secondary,
        ExtractionStrategy::LastResort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtractionStrategy::Primary => "primary",
            ExtractionStrategy::Secondary => "secondary",
            ExtractionStrategy::LastResort => "last_resort",
        }
    }

    /// Raw candidates in document order. URLs are the untouched `href` values.
    pub fn apply(self, doc: &Html, markup: &CompiledMarkup) -> Vec<SearchResult> {
        match self {
            ExtractionStrategy::Primary => primary(doc, markup),
            ExtractionStrategy::Secondary => secondary(doc, markup),
            ExtractionStrategy::LastResort => last_resort(doc, markup),
        }
    }
}

/// Output of the first strategy with a non-empty result, or an empty list.
pub fn extract(html: &str, markup: &CompiledMarkup) -> Vec<SearchResult> {
    extract_with_strategy(html, markup)
        .map(|(_, results)| results)
        .unwrap_or_default()
}

/// Like [`extract`], also reporting which strategy matched.
pub fn extract_with_strategy(
    html: &str,
    markup: &CompiledMarkup,
) -> Option<(ExtractionStrategy, Vec<SearchResult>)> {
    let doc = Html::parse_document(html);
    ExtractionStrategy::CASCADE.into_iter().find_map(|strategy| {
        let results = strategy.apply(&doc, markup);
        (!results.is_empty()).then_some((strategy, results))
    })
}

fn primary(doc: &Html, markup: &CompiledMarkup) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for container in doc.select(&markup.primary_container) {
        let Some(heading) = container.select(&markup.heading).next() else {
            continue;
        };
        let title = collapsed_text(&heading);
        let Some(href) = enclosing_anchor(&heading).and_then(|a| href_of(&a)) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = snippet_within(&container, markup);
        out.push(SearchResult::new(title, href, snippet));
    }
    out
}

fn secondary(doc: &Html, markup: &CompiledMarkup) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for anchor in doc.select(&markup.secondary_anchor) {
        let title = anchor
            .select(&markup.heading)
            .next()
            .map(|h| collapsed_text(&h))
            .unwrap_or_default();
        let Some(href) = href_of(&anchor) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = ancestors(&anchor)
            .find(|el| markup.result_container.matches(el))
            .map(|container| snippet_within(&container, markup))
            .unwrap_or_default();
        out.push(SearchResult::new(title, href, snippet));
    }
    out
}

fn last_resort(doc: &Html, markup: &CompiledMarkup) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for anchor in doc.select(&markup.anchor) {
        let Some(heading) = anchor.select(&markup.heading).next() else {
            continue;
        };
        let title = collapsed_text(&heading);
        let Some(href) = href_of(&anchor) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        out.push(SearchResult::new(title, href, String::new()));
    }
    out
}

fn ancestors<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap)
}

fn enclosing_anchor<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    if el.value().name() == "a" {
        return Some(*el);
    }
    ancestors(el).find(|a| a.value().name() == "a")
}

fn href_of(anchor: &ElementRef<'_>) -> Option<String> {
    let href = anchor.value().attr("href")?.trim();
    (!href.is_empty()).then(|| href.to_string())
}

fn snippet_within(container: &ElementRef<'_>, markup: &CompiledMarkup) -> String {
    markup
        .snippet
        .as_ref()
        .and_then(|sel| container.select(sel).next())
        .map(|n| collapsed_text(&n))
        .unwrap_or_default()
}

fn collapsed_text(el: &ElementRef<'_>) -> String {
    let txt = el.text().collect::<String>();
    txt.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> CompiledMarkup {
        CompiledMarkup::compile(&SerpMarkup::default()).unwrap()
    }

    const PRIMARY_PAGE: &str = r#"
        <html><body><div id="search">
          <div class="g">
            <div class="yuRUbf"><a href="/url?q=https://www.rust-lang.org/&amp;sa=U"><h3>Rust   Programming <b>Language</b></h3></a></div>
            <div class="VwiC3b">A language empowering everyone to build reliable software.</div>
          </div>
          <div class="g">
            <a href="https://doc.rust-lang.org/book/"><h3>The Book</h3></a>
            <span class="aCOpRe">Learn Rust.</span>
          </div>
          <div class="g"><h3>No anchor here</h3></div>
          <div class="g"><a><h3>Anchor without href</h3></a></div>
        </div></body></html>
    "#;

    #[test]
    fn primary_strategy_reads_containers_in_order() {
        let (strategy, results) = extract_with_strategy(PRIMARY_PAGE, &markup()).unwrap();
        assert_eq!(strategy, ExtractionStrategy::Primary);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "/url?q=https://www.rust-lang.org/&sa=U");
        assert_eq!(
            results[0].snippet,
            "A language empowering everyone to build reliable software."
        );
        assert_eq!(results[1].title, "The Book");
        assert_eq!(results[1].snippet, "Learn Rust.");
    }

    #[test]
    fn secondary_strategy_runs_when_primary_container_changed() {
        let page = r#"
            <div id="rso">
              <div class="g MjjYud">
                <div class="yuRUbf"><a href="https://tokio.rs/"><h3>Tokio</h3></a></div>
                <div class="VwiC3b">An asynchronous runtime.</div>
              </div>
              <div class="yuRUbf"><a href="https://serde.rs/"><h3>Serde</h3></a></div>
            </div>
        "#;
        let (strategy, results) = extract_with_strategy(page, &markup()).unwrap();
        assert_eq!(strategy, ExtractionStrategy::Secondary);
        assert_eq!(
            results,
            vec![
                SearchResult::new("Tokio", "https://tokio.rs/", "An asynchronous runtime."),
                SearchResult::new("Serde", "https://serde.rs/", ""),
            ]
        );
    }

    #[test]
    fn last_resort_takes_any_anchor_with_heading() {
        let page = r#"
            <main>
              <a href="https://a.example/"><div><h3>Alpha</h3></div></a>
              <a href="https://b.example/">No heading</a>
              <a href="https://c.example/"><h3>  </h3></a>
              <a href="https://d.example/"><h3>Delta</h3></a>
            </main>
        "#;
        let (strategy, results) = extract_with_strategy(page, &markup()).unwrap();
        assert_eq!(strategy, ExtractionStrategy::LastResort);
        assert_eq!(
            results,
            vec![
                SearchResult::new("Alpha", "https://a.example/", ""),
                SearchResult::new("Delta", "https://d.example/", ""),
            ]
        );
    }

    #[test]
    fn earlier_strategy_shadows_later_ones() {
        let page = r#"
            <div id="search"><div class="g"><a href="https://one.example/"><h3>One</h3></a></div></div>
            <a href="https://two.example/"><h3>Two</h3></a>
        "#;
        let results = extract(page, &markup());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://one.example/");
    }

    #[test]
    fn unmatched_document_is_empty_not_an_error() {
        assert!(extract("<html><body><p>nothing</p></body></html>", &markup()).is_empty());
        assert!(extract("", &markup()).is_empty());
        assert!(extract("<<<not html", &markup()).is_empty());
    }

    #[test]
    fn custom_markup_is_honored() {
        let custom = SerpMarkup {
            primary_container: "li.result".to_string(),
            heading: "h2".to_string(),
            snippet: vec!["p.desc".to_string()],
            ..SerpMarkup::default()
        };
        let compiled = CompiledMarkup::compile(&custom).unwrap();
        let page = r#"<ol><li class="result"><a href="https://x.example/"><h2>X</h2></a><p class="desc">about x</p></li></ol>"#;
        let results = extract(page, &compiled);
        assert_eq!(results, vec![SearchResult::new("X", "https://x.example/", "about x")]);
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let bad = SerpMarkup {
            primary_container: "div[".to_string(),
            ..SerpMarkup::default()
        };
        assert!(matches!(
            CompiledMarkup::compile(&bad),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn empty_snippet_list_yields_empty_snippets() {
        let no_snippet = SerpMarkup {
            snippet: Vec::new(),
            ..SerpMarkup::default()
        };
        let compiled = CompiledMarkup::compile(&no_snippet).unwrap();
        let results = extract(PRIMARY_PAGE, &compiled);
        assert!(results.iter().all(|r| r.snippet.is_empty()));
    }
}
