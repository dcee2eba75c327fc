use std::time::Duration;

use async_trait::async_trait;
use signalscale_core::{
    EngineConfig, Intent, QueryTerm, RawRecord, RecordMetrics, SourceKind, SourceQuery,
};
use tokio::time::Instant;

use crate::collector::{dedup_records, CollectOutcome, Collector, Tally};
use crate::error::CollectError;
use crate::search::{SearchApi, SearchHit, SearchKind};
use crate::text::{marketplace, parse_price};

/// Marketplace listings for the brand and each competitor.
#[derive(Debug)]
pub struct EcommerceCollector {
    api: Option<SearchApi>,
    timeout: Duration,
}

impl EcommerceCollector {
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, CollectError> {
        Ok(Self {
            api: SearchApi::from_config(config)?,
            timeout: config.source_timeout,
        })
    }
}

#[async_trait]
impl Collector for EcommerceCollector {
    fn source(&self) -> SourceKind {
        SourceKind::Ecommerce
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn min_spacing(&self) -> Duration {
        self.api.as_ref().map_or(Duration::ZERO, SearchApi::min_spacing)
    }

    async fn fetch(&self, query: &SourceQuery, budget: Duration) -> CollectOutcome {
        let Some(api) = &self.api else {
            return CollectOutcome::not_configured(SourceKind::Ecommerce);
        };
        let deadline = Instant::now() + budget;
        let mut tally = Tally::new(SourceKind::Ecommerce);
        let mut records = Vec::new();

        for term in query.terms_for(Intent::Listings) {
            if Instant::now() >= deadline {
                tally.mark_timed_out();
                break;
            }
            tally.attempt();
            match api
                .search(&term.text, SearchKind::Products, query.since, deadline)
                .await
            {
                Ok(hits) => {
                    records.extend(hits.into_iter().filter_map(|hit| listing_record(hit, term, query)));
                }
                Err(e) => {
                    tally.fail(&term.text, &e);
                    if tally.timed_out() {
                        break;
                    }
                }
            }
        }

        dedup_records(&mut records);
        tracing::debug!(
            run_id = %query.run_id,
            brand = %query.brand.name,
            records = records.len(),
            "ecommerce collection finished"
        );
        CollectOutcome {
            records,
            sources: Vec::new(),
            warning: tally.into_warning(),
        }
    }
}

fn listing_record(hit: SearchHit, term: &QueryTerm, query: &SourceQuery) -> Option<RawRecord> {
    if hit.url.trim().is_empty() {
        return None;
    }
    let observed_at = hit.timestamp.unwrap_or(query.as_of);
    let text = match (hit.title, hit.text) {
        (Some(title), Some(body)) => Some(format!("{title} {body}")),
        (title, body) => title.or(body),
    };
    let mut record = RawRecord::new(
        SourceKind::Ecommerce,
        marketplace(&hit.url),
        hit.url,
        Intent::Listings,
        observed_at,
    );
    record.subject.clone_from(&term.subject);
    record.author = hit.author;
    record.text = text;
    record.metrics = RecordMetrics {
        likes: hit.likes,
        comments: hit.comments,
        shares: hit.shares,
        score: hit.rating.filter(|r| r.is_finite()),
        price: hit.price.as_ref().and_then(parse_price),
        ..RecordMetrics::default()
    };
    Some(record)
}
