//! Raw observations produced by collectors, plus run-level warnings and provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External source family. Declaration order is the merge priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Social,
    Ecommerce,
    Website,
    Trend,
}

impl SourceKind {
    /// All source families in merge-priority order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Social,
        SourceKind::Ecommerce,
        SourceKind::Website,
        SourceKind::Trend,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Social => "social",
            SourceKind::Ecommerce => "ecommerce",
            SourceKind::Website => "website",
            SourceKind::Trend => "trend",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a record was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Social posts matching the brand query.
    Mentions,
    /// Posts surfaced by creator-discovery queries.
    Creators,
    /// Marketplace product listings.
    Listings,
    /// One audited brand website.
    SiteAudit,
    /// Cultural trend feed items.
    Culture,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    pub followers: Option<u64>,
    /// Interactions per follower, `0.0..`.
    pub engagement_rate: Option<f64>,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Source-specific rating (marketplace stars, feed rank).
    pub score: Option<f64>,
    pub price: Option<f64>,
}

impl RecordMetrics {
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }
}

/// One observation from one source. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub source: SourceKind,
    /// Concrete platform or feed, e.g. `instagram`, `stockx`, `hypebeast.com`.
    pub platform: String,
    pub url: String,
    pub intent: Intent,
    /// Brand or competitor this record was collected for, when known.
    pub subject: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub text: Option<String>,
    pub hashtags: Vec<String>,
    pub metrics: RecordMetrics,
    /// Ids of website heuristics that passed, e.g. `homepage.hero_clarity`.
    pub heuristics: Vec<String>,
    pub observed_at: DateTime<Utc>,
}

impl RawRecord {
    /// Minimal record; callers fill in the optional fields they have.
    #[must_use]
    pub fn new(
        source: SourceKind,
        platform: impl Into<String>,
        url: impl Into<String>,
        intent: Intent,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            platform: platform.into(),
            url: url.into(),
            intent,
            subject: None,
            author: None,
            author_url: None,
            text: None,
            hashtags: Vec::new(),
            metrics: RecordMetrics::default(),
            heuristics: Vec::new(),
            observed_at,
        }
    }

    /// Non-empty text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// A recoverable, per-source problem. Accumulated, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub source: String,
    pub message: String,
}

impl Warning {
    #[must_use]
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timed_out(source: &str) -> Self {
        Self::new(source, format!("{source} timed out"))
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Every URL a collector actually read during a run, first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub sources: Vec<String>,
}

impl Provenance {
    /// Append `url` unless it is blank or already recorded.
    pub fn record(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() || self.contains(url) {
            return;
        }
        self.sources.push(url.to_string());
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.sources.iter().any(|s| s == url)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_order_is_merge_priority() {
        let mut kinds = vec![
            SourceKind::Trend,
            SourceKind::Website,
            SourceKind::Social,
            SourceKind::Ecommerce,
        ];
        kinds.sort();
        assert_eq!(kinds, SourceKind::ALL.to_vec());
    }

    #[test]
    fn provenance_ignores_duplicates_and_blanks() {
        let mut p = Provenance::default();
        p.record("https://a.example/1");
        p.record("  ");
        p.record("https://a.example/1");
        p.record("https://b.example/2");
        assert_eq!(
            p.sources,
            vec!["https://a.example/1", "https://b.example/2"]
        );
    }

    #[test]
    fn timed_out_warning_names_source() {
        let w = Warning::timed_out("website");
        assert_eq!(w.source, "website");
        assert_eq!(w.to_string(), "website: website timed out");
    }

    #[test]
    fn interactions_saturate() {
        let m = RecordMetrics {
            likes: u64::MAX,
            comments: 5,
            ..RecordMetrics::default()
        };
        assert_eq!(m.interactions(), u64::MAX);
    }

    #[test]
    fn blank_text_is_none() {
        let mut r = RawRecord::new(
            SourceKind::Social,
            "instagram",
            "https://instagram.com/p/1",
            Intent::Mentions,
            Utc::now(),
        );
        r.text = Some("   ".to_string());
        assert!(r.text().is_none());
    }
}
