pub mod google;
pub mod serpapi;

use reqwest::StatusCode;

/// Upstream statuses that mean "slow down", not "broken".
pub fn is_rate_limit_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

/// Best-effort label for a block/interstitial page. Used for diagnostics only;
/// it never changes how a response is classified.
pub fn detect_block_reason(status: StatusCode, body: &str) -> Option<String> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some("http_429".to_string());
    }
    if status == StatusCode::FORBIDDEN {
        return Some("http_403".to_string());
    }
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Some("http_503".to_string());
    }
    detect_block_page(body)
}

/// Label derived from the page body alone, whatever the status was.
pub fn detect_block_page(body: &str) -> Option<String> {
    let lower = body.to_lowercase();
    let maybe = [
        ("unusual traffic", "unusual_traffic"),
        (
            "sorry, but your computer or network may be sending automated queries",
            "captcha",
        ),
        ("captcha", "captcha"),
        ("verify you are human", "captcha"),
        ("before you continue to google", "consent"),
        ("enable javascript", "js_required"),
        ("access denied", "access_denied"),
    ];

    for (needle, label) in maybe {
        if lower.contains(needle) {
            return Some(label.to_string());
        }
    }

    // Heuristic: tiny HTML + any block-ish token
    if body.len() < 3500 && lower.contains("blocked") {
        return Some("block_page".to_string());
    }

    None
}
