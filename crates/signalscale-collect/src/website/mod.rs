//! Brand website audits for the peer tracker.

mod heuristics;
mod resolver;

pub use heuristics::{evaluate, find_product_link, page_title};
pub use resolver::BrandResolver;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use signalscale_core::{EngineConfig, Intent, RawRecord, SourceKind, SourceQuery};
use tokio::time::Instant;

use crate::client::{host_of, normalize_site_url, HttpClient};
use crate::collector::{CollectOutcome, Collector, Tally};
use crate::error::CollectError;

/// Fetches each brand's homepage and one product page, and emits one
/// `SiteAudit` record per site listing the heuristics that passed.
///
/// Brands without a URL are looked up through the [`BrandResolver`] when one
/// is configured.
#[derive(Debug)]
pub struct WebsiteCollector {
    http: HttpClient,
    resolver: Option<BrandResolver>,
    timeout: Duration,
    site_concurrency: usize,
}

/// Result of auditing one site.
struct SiteAudit {
    site: String,
    record: Option<RawRecord>,
    sources: Vec<String>,
    error: Option<CollectError>,
}

impl WebsiteCollector {
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, CollectError> {
        Ok(Self {
            http: HttpClient::new(config)?,
            resolver: config.resolver_api_url.as_deref().map(BrandResolver::new),
            timeout: config.source_timeout,
            site_concurrency: config.site_concurrency.max(1),
        })
    }

    /// Given URL, else the resolved official site.
    async fn site_url(
        &self,
        subject: &str,
        given: Option<String>,
        deadline: Instant,
    ) -> Option<String> {
        if given.is_some() {
            return given;
        }
        let resolver = self.resolver.as_ref()?;
        match resolver.resolve(&self.http, subject, deadline).await {
            Ok(Some(url)) => {
                tracing::debug!(subject, url = %url, "resolved official site");
                Some(url)
            }
            Ok(None) => {
                tracing::debug!(subject, "no official site found");
                None
            }
            Err(e) => {
                tracing::debug!(subject, error = %e, "site lookup failed");
                None
            }
        }
    }

    async fn audit(
        &self,
        subject: String,
        site_url: String,
        as_of: DateTime<Utc>,
        deadline: Instant,
    ) -> SiteAudit {
        let home_url = normalize_site_url(&site_url);
        let host = match host_of(&home_url) {
            Ok(host) => host,
            Err(e) => {
                return SiteAudit {
                    site: home_url,
                    record: None,
                    sources: Vec::new(),
                    error: Some(e),
                }
            }
        };
        let home = match self.http.get_text(&home_url, deadline).await {
            Ok(html) => html,
            Err(e) => {
                return SiteAudit {
                    site: home_url,
                    record: None,
                    sources: Vec::new(),
                    error: Some(e),
                }
            }
        };
        let mut sources = vec![home_url.clone()];

        let mut error = None;
        let mut product_html = None;
        if let Some(product_url) = find_product_link(&home, &home_url) {
            match self.http.get_text(&product_url, deadline).await {
                Ok(html) => {
                    sources.push(product_url);
                    product_html = Some(html);
                }
                Err(e) => {
                    tracing::debug!(subject, product_url, error = %e, "product page fetch failed");
                    error = Some(e);
                }
            }
        } else {
            tracing::debug!(subject, home_url, "no product page link found");
        }

        let mut record = RawRecord::new(
            SourceKind::Website,
            host,
            home_url,
            Intent::SiteAudit,
            as_of,
        );
        record.heuristics = evaluate(&home, product_html.as_deref());
        record.text = page_title(&home);
        record.subject = Some(subject);

        SiteAudit {
            site: site_url,
            record: Some(record),
            sources,
            error,
        }
    }
}

#[async_trait]
impl Collector for WebsiteCollector {
    fn source(&self) -> SourceKind {
        SourceKind::Website
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn min_spacing(&self) -> Duration {
        self.http.min_spacing()
    }

    async fn fetch(&self, query: &SourceQuery, budget: Duration) -> CollectOutcome {
        let deadline = Instant::now() + budget;
        let sites: Vec<(String, Option<String>)> = query
            .subjects()
            .into_iter()
            .map(|(name, url)| {
                let url = url.map(str::trim).filter(|u| !u.is_empty());
                (name.to_string(), url.map(str::to_string))
            })
            .collect();
        if self.resolver.is_none() && sites.iter().all(|(_, url)| url.is_none()) {
            return CollectOutcome::with_warning(SourceKind::Website, "no site URLs to audit");
        }

        let mut tally = Tally::new(SourceKind::Website);
        let audits: Vec<SiteAudit> = stream::iter(sites)
            .map(|(name, url)| async move {
                let url = self.site_url(&name, url, deadline).await?;
                Some(self.audit(name, url, query.as_of, deadline).await)
            })
            .buffered(self.site_concurrency)
            .filter_map(std::future::ready)
            .collect()
            .await;
        if audits.is_empty() {
            return CollectOutcome::with_warning(SourceKind::Website, "no site URLs to audit");
        }

        let mut outcome = CollectOutcome::default();
        for audit in audits {
            tally.attempt();
            if let Some(err) = &audit.error {
                tally.fail(&audit.site, err);
            }
            outcome.sources.extend(audit.sources);
            outcome.records.extend(audit.record);
        }

        tracing::debug!(
            run_id = %query.run_id,
            audited = outcome.records.len(),
            "website audits finished"
        );
        outcome.warning = tally.into_warning();
        outcome
    }
}
