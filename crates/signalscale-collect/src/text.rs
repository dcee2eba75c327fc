//! Small text helpers shared by the collectors.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_]{2,})").expect("valid hashtag regex"));

/// Social platforms recognised from a post URL, keyed by domain fragment.
const SOCIAL_PLATFORMS: &[(&str, &str)] = &[
    ("instagram.com", "instagram"),
    ("tiktok.com", "tiktok"),
    ("twitter.com", "twitter"),
    ("x.com", "twitter"),
    ("reddit.com", "reddit"),
    ("youtube.com", "youtube"),
    ("youtu.be", "youtube"),
    ("facebook.com", "facebook"),
];

/// Marketplaces searched for product listings.
pub const MARKETPLACES: &[(&str, &str)] = &[
    ("amazon.com", "amazon"),
    ("ebay.com", "ebay"),
    ("stockx.com", "stockx"),
    ("grailed.com", "grailed"),
    ("depop.com", "depop"),
    ("farfetch.com", "farfetch"),
    ("ssense.com", "ssense"),
];

/// Lowercased, de-duplicated hashtags (with `#`) in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for cap in HASHTAG_RE.captures_iter(text) {
        let tag = format!("#{}", cap[1].to_lowercase());
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn match_domain(url: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    let host = crate::client::host_of(url).ok()?;
    table.iter().find_map(|(domain, name)| {
        (host == *domain || host.ends_with(&format!(".{domain}"))).then_some(*name)
    })
}

/// Social platform name for a post URL, `web` when unrecognised.
pub fn social_platform(url: &str) -> &'static str {
    match_domain(url, SOCIAL_PLATFORMS).unwrap_or("web")
}

/// Marketplace name for a listing URL, `web` when unrecognised.
pub fn marketplace(url: &str) -> &'static str {
    match_domain(url, MARKETPLACES).unwrap_or("web")
}

/// Parse `89.99`, `"$89.99"`, `"USD 1,200"` or `"€45"` into a number.
pub fn parse_price(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
    .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Strip HTML tags from a string and normalize whitespace.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn hashtags_are_lowercased_and_deduplicated() {
        assert_eq!(
            extract_hashtags("New #FitCheck with #ootd and #fitcheck again #a"),
            vec!["#fitcheck", "#ootd"]
        );
    }

    #[test]
    fn social_platform_matches_subdomains() {
        assert_eq!(social_platform("https://www.tiktok.com/@a/video/1"), "tiktok");
        assert_eq!(social_platform("https://old.reddit.com/r/streetwear"), "reddit");
        assert_eq!(social_platform("https://x.com/a/status/1"), "twitter");
        assert_eq!(social_platform("https://blog.example.com/p"), "web");
    }

    #[test]
    fn marketplace_lookup() {
        assert_eq!(marketplace("https://stockx.com/acme-tee"), "stockx");
        assert_eq!(marketplace("https://www.ebay.com/itm/1"), "ebay");
        assert_eq!(marketplace("https://notebay.com/itm/1"), "web");
    }

    #[test]
    fn price_parsing_accepts_numbers_and_strings() {
        assert_eq!(parse_price(&json!(89.5)), Some(89.5));
        assert_eq!(parse_price(&json!("$1,200.00")), Some(1200.0));
        assert_eq!(parse_price(&json!("sold out")), None);
        assert_eq!(parse_price(&json!(null)), None);
    }

    #[test]
    fn strip_html_keeps_words_apart() {
        assert_eq!(strip_html("<p>Fresh</p><p>drop</p>"), "Fresh drop");
    }
}
