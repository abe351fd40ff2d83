use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::core::config::SearchConfig;
use crate::tools::search::fetch::{FetchOutcome, Fetcher};

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// SERP URL for `keyword`: English, US, `num` results, safe search on,
/// personalization off.
pub fn search_url(config: &SearchConfig, keyword: &str) -> Url {
    let mut url = config.search_base_url.clone();
    url.set_query(Some(&format!(
        "q={}&hl={}&gl={}&num={}&safe=active&pws=0",
        encode(keyword),
        encode(&config.hl),
        encode(&config.gl),
        config.num
    )));
    url
}

pub async fn fetch_serp(
    fetcher: &dyn Fetcher,
    config: &SearchConfig,
    keyword: &str,
) -> FetchOutcome {
    let url = search_url(config, keyword);
    let headers = crate::antibot::serp_headers(config);
    fetcher.fetch(&url, &headers, config.request_timeout).await
}
