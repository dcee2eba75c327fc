use chrono::{DateTime, Duration, Utc};
use signalscale_core::{PriceBand, RawRecord, ValidatedRequest};

use crate::text::MatchText;

/// Everything an analyzer needs to know about the run besides its records.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub brand: String,
    /// Lowercased terms that count as a brand mention.
    pub brand_keywords: Vec<String>,
    pub competitors: Vec<String>,
    pub as_of: DateTime<Utc>,
    pub window_days: u32,
    pub min_engagement_rate: f64,
    pub max_followers: u64,
    pub price_band: Option<PriceBand>,
    pub price_band_label: String,
}

impl AnalysisContext {
    #[must_use]
    pub fn from_request(request: &ValidatedRequest, as_of: DateTime<Utc>) -> Self {
        Self {
            brand: request.brand.name.clone(),
            brand_keywords: request.brand.keywords(),
            competitors: request.competitor_names(),
            as_of,
            window_days: request.window_days,
            min_engagement_rate: request.min_engagement_rate,
            max_followers: request.influencer_max_followers,
            price_band: request.price_band,
            price_band_label: request.price_band_label.clone(),
        }
    }

    fn window(&self) -> Duration {
        Duration::days(i64::from(self.window_days))
    }

    #[must_use]
    pub fn window_start(&self) -> DateTime<Utc> {
        self.as_of - self.window()
    }

    #[must_use]
    pub fn previous_window_start(&self) -> DateTime<Utc> {
        self.as_of - self.window() - self.window()
    }

    /// `[as_of - window, as_of]`
    #[must_use]
    pub fn in_current_window(&self, at: DateTime<Utc>) -> bool {
        at >= self.window_start() && at <= self.as_of
    }

    /// `[as_of - 2*window, as_of - window)`
    #[must_use]
    pub fn in_previous_window(&self, at: DateTime<Utc>) -> bool {
        at >= self.previous_window_start() && at < self.window_start()
    }

    #[must_use]
    pub fn mentions_brand(&self, text: &MatchText) -> bool {
        text.has_any(self.brand_keywords.as_slice())
    }

    /// Brand followed by competitors, in request order.
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        std::iter::once(self.brand.as_str())
            .chain(self.competitors.iter().map(String::as_str))
            .collect()
    }

    /// `true` when `record` was collected for a competitor.
    #[must_use]
    pub fn is_competitor_record(&self, record: &RawRecord) -> bool {
        record
            .subject
            .as_deref()
            .is_some_and(|s| self.competitors.iter().any(|c| c == s))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use signalscale_core::{AnalysisRequest, Competitor, Intent, RawRecord, SourceKind};

    use super::AnalysisContext;

    pub(crate) fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    pub(crate) fn days_ago(days: i64) -> DateTime<Utc> {
        as_of() - Duration::days(days)
    }

    /// Brand `Acme`, competitors `Beta` and `Gamma`, 7-day window.
    pub(crate) fn ctx() -> AnalysisContext {
        let mut req = AnalysisRequest::for_brand("Acme");
        req.competitors = vec![
            Competitor {
                name: "Beta".to_owned(),
                url: None,
            },
            Competitor {
                name: "Gamma".to_owned(),
                url: None,
            },
        ];
        AnalysisContext::from_request(&req.validate().unwrap(), as_of())
    }

    pub(crate) fn post(url: &str, platform: &str, text: &str, at: DateTime<Utc>) -> RawRecord {
        let mut record = RawRecord::new(SourceKind::Social, platform, url, Intent::Mentions, at);
        record.text = Some(text.to_owned());
        record
    }
}
