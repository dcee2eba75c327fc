use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Intent, SourceKind};
use crate::request::{Brand, Competitor, PriceBand, ValidatedRequest};

/// One search string plus the reason it is being issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTerm {
    pub intent: Intent,
    pub text: String,
    /// Brand or competitor the term targets, when it targets exactly one.
    #[serde(default)]
    pub subject: Option<String>,
}

impl QueryTerm {
    #[must_use]
    pub fn new(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            intent,
            text: text.into(),
            subject: None,
        }
    }

    #[must_use]
    pub fn about(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// What a single collector should fetch for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQuery {
    pub run_id: Uuid,
    pub source: SourceKind,
    pub brand: Brand,
    pub competitors: Vec<Competitor>,
    pub terms: Vec<QueryTerm>,
    pub window_days: u32,
    pub as_of: DateTime<Utc>,
    /// Start of the previous window: `as_of - 2 * window_days`.
    pub since: DateTime<Utc>,
    pub price_band: Option<PriceBand>,
    pub max_followers: u64,
}

impl SourceQuery {
    /// Build the base query for `source`; terms are filled in by the router.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        source: SourceKind,
        request: &ValidatedRequest,
        as_of: DateTime<Utc>,
    ) -> Self {
        let since = as_of - Duration::days(i64::from(request.window_days) * 2);
        Self {
            run_id,
            source,
            brand: request.brand.clone(),
            competitors: request.competitors.clone(),
            terms: Vec::new(),
            window_days: request.window_days,
            as_of,
            since,
            price_band: request.price_band,
            max_followers: request.influencer_max_followers,
        }
    }

    /// Terms issued for `intent`, in insertion order.
    pub fn terms_for(&self, intent: Intent) -> impl Iterator<Item = &QueryTerm> {
        self.terms.iter().filter(move |t| t.intent == intent)
    }

    /// Brand first, then competitors, each with an optional site URL.
    #[must_use]
    pub fn subjects(&self) -> Vec<(&str, Option<&str>)> {
        std::iter::once((self.brand.name.as_str(), self.brand.url.as_deref()))
            .chain(
                self.competitors
                    .iter()
                    .map(|c| (c.name.as_str(), c.url.as_deref())),
            )
            .collect()
    }
}
