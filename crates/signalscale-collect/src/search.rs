//! Client for the JSON search endpoint shared by the social and e-commerce
//! collectors.
//!
//! `GET {base}?q=<query>&since=<rfc3339>&limit=<n>[&type=product]` returning
//! `{"results": [SearchHit, ...]}`.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use serde::Deserialize;
use signalscale_core::EngineConfig;
use tokio::time::Instant;

use crate::client::HttpClient;
use crate::error::CollectError;

/// Results requested per query.
pub const RESULTS_PER_QUERY: u32 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_profile: Option<String>,
    #[serde(default)]
    pub author_followers: Option<u64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Listing price, either a number or a display string such as `"$89.99"`.
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Posts,
    Products,
}

#[derive(Debug)]
pub struct SearchApi {
    http: HttpClient,
    base_url: String,
}

impl SearchApi {
    /// `None` when no search endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &EngineConfig) -> Result<Option<Self>, CollectError> {
        let Some(base_url) = config.search_api_url.clone() else {
            return Ok(None);
        };
        let http = HttpClient::new(config)?.with_bearer(config.search_api_key.clone());
        Ok(Some(Self { http, base_url }))
    }

    #[must_use]
    pub fn min_spacing(&self) -> std::time::Duration {
        self.http.min_spacing()
    }

    /// Run one search.
    ///
    /// # Errors
    ///
    /// Propagates [`HttpClient::get_json`] failures and
    /// [`CollectError::InvalidUrl`] when the base URL does not parse.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        since: DateTime<Utc>,
        deadline: Instant,
    ) -> Result<Vec<SearchHit>, CollectError> {
        let url = self.search_url(query, kind, since)?;
        let response: SearchResponse = self
            .http
            .get_json(&url, deadline, &format!("search results for {query}"))
            .await?;
        Ok(response.results)
    }

    fn search_url(
        &self,
        query: &str,
        kind: SearchKind,
        since: DateTime<Utc>,
    ) -> Result<String, CollectError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| CollectError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true))
                .append_pair("limit", &RESULTS_PER_QUERY.to_string());
            if kind == SearchKind::Products {
                pairs.append_pair("type", "product");
            }
        }
        Ok(url.to_string())
    }
}
