use std::time::Duration;

use async_trait::async_trait;
use signalscale_core::{EngineConfig, Intent, RawRecord, SourceKind, SourceQuery};
use tokio::time::Instant;

use crate::client::{host_of, HttpClient};
use crate::collector::{dedup_records, CollectOutcome, Collector, Tally};
use crate::error::CollectError;
use crate::rss::{parse_rss_feed, FeedItem};
use crate::text::extract_hashtags;

/// Items read from a single feed.
const MAX_ITEMS_PER_FEED: usize = 50;

/// Cultural trend items from the configured RSS feeds.
#[derive(Debug)]
pub struct TrendCollector {
    http: HttpClient,
    feeds: Vec<String>,
    timeout: Duration,
}

impl TrendCollector {
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, CollectError> {
        Ok(Self {
            http: HttpClient::new(config)?,
            feeds: config.trend_feeds.clone(),
            timeout: config.source_timeout,
        })
    }
}

#[async_trait]
impl Collector for TrendCollector {
    fn source(&self) -> SourceKind {
        SourceKind::Trend
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn min_spacing(&self) -> Duration {
        self.http.min_spacing()
    }

    async fn fetch(&self, query: &SourceQuery, budget: Duration) -> CollectOutcome {
        if self.feeds.is_empty() {
            return CollectOutcome::not_configured(SourceKind::Trend);
        }
        let deadline = Instant::now() + budget;
        let mut tally = Tally::new(SourceKind::Trend);
        let mut outcome = CollectOutcome::default();

        for feed_url in &self.feeds {
            if Instant::now() >= deadline {
                tally.mark_timed_out();
                break;
            }
            tally.attempt();
            let items = match self.http.get_text(feed_url, deadline).await {
                Ok(xml) => parse_rss_feed(&xml, MAX_ITEMS_PER_FEED),
                Err(e) => Err(e),
            };
            match items {
                Ok(items) => {
                    outcome.sources.push(feed_url.clone());
                    let platform = host_of(feed_url).unwrap_or_else(|_| feed_url.clone());
                    outcome.records.extend(
                        items
                            .into_iter()
                            .filter_map(|item| culture_record(item, &platform, query)),
                    );
                }
                Err(e) => {
                    tally.fail(feed_url, &e);
                    if tally.timed_out() {
                        break;
                    }
                }
            }
        }

        dedup_records(&mut outcome.records);
        tracing::debug!(
            run_id = %query.run_id,
            feeds = self.feeds.len(),
            records = outcome.records.len(),
            "trend collection finished"
        );
        outcome.warning = tally.into_warning();
        outcome
    }
}

fn culture_record(item: FeedItem, platform: &str, query: &SourceQuery) -> Option<RawRecord> {
    let observed_at = item.published.unwrap_or(query.as_of);
    if observed_at < query.since {
        return None;
    }
    let text = item.text();
    let mut record = RawRecord::new(
        SourceKind::Trend,
        platform,
        item.link,
        Intent::Culture,
        observed_at,
    );
    record.hashtags = extract_hashtags(&text);
    record.text = Some(text);
    Some(record)
}
