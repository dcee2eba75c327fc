use std::time::Duration;

use async_trait::async_trait;
use signalscale_core::{
    EngineConfig, Intent, QueryTerm, RawRecord, RecordMetrics, SourceKind, SourceQuery,
};
use tokio::time::Instant;

use crate::collector::{dedup_records, CollectOutcome, Collector, Tally};
use crate::error::CollectError;
use crate::search::{SearchApi, SearchHit, SearchKind};
use crate::text::{extract_hashtags, social_platform};

/// Social posts from the search API: brand mentions and creator discovery.
#[derive(Debug)]
pub struct SocialCollector {
    api: Option<SearchApi>,
    timeout: Duration,
}

impl SocialCollector {
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
impl Collector for SocialCollector {
    fn source(&self) -> SourceKind {
        SourceKind::Social
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn min_spacing(&self) -> Duration {
        self.api.as_ref().map_or(Duration::ZERO, SearchApi::min_spacing)
    }

    async fn fetch(&self, query: &SourceQuery, budget: Duration) -> CollectOutcome {
        let Some(api) = &self.api else {
            return CollectOutcome::not_configured(SourceKind::Social);
        };
        let deadline = Instant::now() + budget;
        let mut tally = Tally::new(SourceKind::Social);
        let mut records = Vec::new();

        let terms = query
            .terms
            .iter()
            .filter(|t| matches!(t.intent, Intent::Mentions | Intent::Creators));
        for term in terms {
            if Instant::now() >= deadline {
                tally.mark_timed_out();
                break;
            }
            tally.attempt();
            match api
                .search(&term.text, SearchKind::Posts, query.since, deadline)
                .await
            {
                Ok(hits) => {
                    records.extend(hits.into_iter().filter_map(|hit| post_record(hit, term, query)));
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
            "social collection finished"
        );
        CollectOutcome {
            records,
            sources: Vec::new(),
            warning: tally.into_warning(),
        }
    }
}

/// Interactions per follower; `None` without a follower count.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn engagement_rate(metrics: &RecordMetrics) -> Option<f64> {
    let followers = metrics.followers.filter(|f| *f > 0)?;
    Some(metrics.interactions() as f64 / followers as f64)
}

fn post_record(hit: SearchHit, term: &QueryTerm, query: &SourceQuery) -> Option<RawRecord> {
    let observed_at = hit.timestamp.unwrap_or(query.as_of);
    if observed_at < query.since || hit.url.trim().is_empty() {
        return None;
    }

    let text = match (hit.title, hit.text) {
        (Some(title), Some(body)) => Some(format!("{title} {body}")),
        (title, body) => body.or(title),
    };
    let mut record = RawRecord::new(
        SourceKind::Social,
        social_platform(&hit.url),
        hit.url,
        term.intent,
        observed_at,
    );
    record.subject.clone_from(&term.subject);
    record.author = hit.author;
    record.author_url = hit.author_profile;
    record.hashtags = text.as_deref().map(extract_hashtags).unwrap_or_default();
    record.text = text;
    record.metrics = RecordMetrics {
        followers: hit.author_followers,
        likes: hit.likes,
        comments: hit.comments,
        shares: hit.shares,
        ..RecordMetrics::default()
    };
    record.metrics.engagement_rate = engagement_rate(&record.metrics);
    Some(record)
}
