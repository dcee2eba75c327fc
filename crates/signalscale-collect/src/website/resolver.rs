//! Official-site lookup for brands that arrive without a URL.
//!
//! Uses the MediaWiki action API: one full-text search for the brand's page,
//! then that page's external links. The first non-social link wins, unless a
//! later one is a bare `.com` root.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use tokio::time::Instant;

use crate::client::HttpClient;
use crate::error::CollectError;

static SOCIAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(facebook|instagram|twitter|x\.com|tiktok|youtube|linkedin|pinterest)")
        .expect("valid social link regex")
});
static DOT_COM_ROOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.com/?$").expect("valid dot-com regex"));

#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    pageid: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    extlinks: Vec<ExtLink>,
}

#[derive(Debug, Deserialize)]
struct ExtLink {
    #[serde(rename = "*", default)]
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BrandResolver {
    api_url: String,
}

impl BrandResolver {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// `https://<domain>` of `brand`'s official site, or `None` when no page
    /// or no usable link is found.
    ///
    /// # Errors
    ///
    /// Propagates [`HttpClient::get_json`] failures and
    /// [`CollectError::InvalidUrl`] when the API URL does not parse.
    pub async fn resolve(
        &self,
        http: &HttpClient,
        brand: &str,
        deadline: Instant,
    ) -> Result<Option<String>, CollectError> {
        let brand = brand.trim();
        if brand.is_empty() {
            return Ok(None);
        }

        let search_url = self.api_call(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", brand),
            ("srlimit", "1"),
            ("format", "json"),
        ])?;
        let search: ApiResponse = http
            .get_json(&search_url, deadline, &format!("page search for {brand}"))
            .await?;
        let Some(page_id) = search
            .query
            .and_then(|q| q.search.into_iter().next())
            .and_then(|hit| hit.pageid)
        else {
            return Ok(None);
        };

        let page_id = page_id.to_string();
        let links_url = self.api_call(&[
            ("action", "query"),
            ("prop", "extlinks"),
            ("pageids", &page_id),
            ("ellimit", "500"),
            ("format", "json"),
        ])?;
        let links: ApiResponse = http
            .get_json(&links_url, deadline, &format!("external links for {brand}"))
            .await?;
        let urls: Vec<String> = links
            .query
            .and_then(|mut q| q.pages.remove(&page_id))
            .map(|page| page.extlinks.into_iter().filter_map(|l| l.url).collect())
            .unwrap_or_default();

        Ok(pick_official(&urls)
            .and_then(bare_domain)
            .map(|domain| format!("https://{domain}")))
    }

    fn api_call(&self, params: &[(&str, &str)]) -> Result<String, CollectError> {
        let mut url = Url::parse(&self.api_url).map_err(|e| CollectError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url.to_string())
    }
}

fn pick_official(links: &[String]) -> Option<&str> {
    let mut best = None;
    for link in links.iter().map(String::as_str) {
        if SOCIAL_LINK_RE.is_match(link) {
            continue;
        }
        best = Some(link);
        if DOT_COM_ROOT_RE.is_match(link) {
            break;
        }
    }
    best
}

/// Lowercased host without scheme or `www.`. Accepts protocol-relative links.
fn bare_domain(url: &str) -> Option<String> {
    let lower = url.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower)
        .trim_start_matches("//");
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let host = rest.split(['/', '?', '#']).next()?.trim();
    (!host.is_empty()).then(|| host.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| (*u).to_owned()).collect()
    }

    #[test]
    fn social_links_are_skipped() {
        let urls = links(&[
            "https://www.instagram.com/acme",
            "https://twitter.com/acme",
            "https://shop.acme.co.uk/about",
        ]);
        assert_eq!(pick_official(&urls), Some("https://shop.acme.co.uk/about"));
    }

    #[test]
    fn dot_com_root_wins_early() {
        let urls = links(&[
            "https://acme.com/",
            "https://press.example.org/acme-profile",
        ]);
        assert_eq!(pick_official(&urls), Some("https://acme.com/"));
    }

    #[test]
    fn only_social_links_resolve_to_nothing() {
        let urls = links(&["https://www.tiktok.com/@acme", "https://youtube.com/acme"]);
        assert!(pick_official(&urls).is_none());
    }

    #[test]
    fn bare_domain_strips_scheme_www_and_path() {
        assert_eq!(bare_domain("https://WWW.Acme.com/en-us/").as_deref(), Some("acme.com"));
        assert_eq!(bare_domain("//www.acme.com").as_deref(), Some("acme.com"));
        assert_eq!(bare_domain("acme.com?ref=wiki").as_deref(), Some("acme.com"));
        assert!(bare_domain("https://").is_none());
    }

    #[test]
    fn api_call_encodes_params() {
        let resolver = BrandResolver::new("https://en.wikipedia.org/w/api.php");
        let url = resolver
            .api_call(&[("srsearch", "The North Face"), ("format", "json")])
            .unwrap();
        assert_eq!(
            url,
            "https://en.wikipedia.org/w/api.php?srsearch=The+North+Face&format=json"
        );
    }
}
