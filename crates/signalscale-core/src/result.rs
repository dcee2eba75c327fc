//! Output sections and the scored entities they carry.

use serde::{Deserialize, Serialize};

use crate::record::{Provenance, Warning};

/// Peer tracker scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Homepage,
    #[serde(rename = "PDP")]
    Pdp,
    Checkout,
    ContentCommunity,
    #[serde(rename = "MobileUX")]
    MobileUx,
    PricePresentation,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Homepage,
        Dimension::Pdp,
        Dimension::Checkout,
        Dimension::ContentCommunity,
        Dimension::MobileUx,
        Dimension::PricePresentation,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Homepage => "Homepage",
            Dimension::Pdp => "PDP",
            Dimension::Checkout => "Checkout",
            Dimension::ContentCommunity => "ContentCommunity",
            Dimension::MobileUx => "MobileUX",
            Dimension::PricePresentation => "PricePresentation",
        }
    }

    /// Prefix used by heuristic ids, e.g. `pdp.reviews_ugc`.
    #[must_use]
    pub fn heuristic_prefix(self) -> &'static str {
        match self {
            Dimension::Homepage => "homepage",
            Dimension::Pdp => "pdp",
            Dimension::Checkout => "checkout",
            Dimension::ContentCommunity => "content",
            Dimension::MobileUx => "mobile",
            Dimension::PricePresentation => "price",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Opportunity,
    Risk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Seed,
    Collab,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFocus {
    Streetwear,
    Fashion,
    Music,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Rising,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorCandidate {
    pub handle: String,
    pub platform: String,
    pub profile_url: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub brand_mentioned: bool,
    pub content_focus: ContentFocus,
    /// 1 when the creator already mentions the brand, else 2.
    pub tier: u8,
    pub recommendation: Recommendation,
    pub influence_score: u8,
    /// Post URLs the candidate was derived from.
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor: Option<String>,
    pub insight: String,
    pub action: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerScoreEntry {
    pub dimension: Dimension,
    pub brand: String,
    pub score: u8,
    pub notes: Vec<String>,
    /// Audited page the score was computed from.
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionsOverview {
    pub this_window: u64,
    pub prev_window: u64,
    /// `None` when the previous window had no mentions but this one did.
    pub delta_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentCounts {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSentiment {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
    pub counts: SentimentCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementHighlight {
    pub platform: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub interactions: u64,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub theme: String,
    pub mentions: u64,
    /// Distinct platforms the theme was seen on. Always 2 or more.
    pub platforms: Vec<String>,
    pub momentum: Momentum,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub brand_mentions_overview: MentionsOverview,
    pub customer_sentiment: CustomerSentiment,
    pub engagement_highlights: Vec<EngagementHighlight>,
    pub trends: Vec<TrendSignal>,
    pub competitive_mentions: Vec<MentionInsight>,
    pub opportunities_risks: Vec<MentionInsight>,
}

/// A creator picked for outreach, with the reason it was picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub handle: String,
    pub platform: String,
    pub profile_url: String,
    pub influence_score: u8,
    pub action: Recommendation,
    pub why: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalRadar {
    pub creators: Vec<CreatorCandidate>,
    pub top_3_to_activate: Vec<Activation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub dimensions: Vec<Dimension>,
    pub brands: Vec<String>,
    pub scores: Vec<PeerScoreEntry>,
}

impl Scorecard {
    #[must_use]
    pub fn score(&self, dimension: Dimension, brand: &str) -> Option<u8> {
        self.scores
            .iter()
            .find(|e| e.dimension == dimension && e.brand == brand)
            .map(|e| e.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFix {
    pub dimension: Dimension,
    pub brand_score: u8,
    pub best_competitor: String,
    pub competitor_score: u8,
    pub gap: u8,
    pub impact: Impact,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionComparison {
    pub dimension: Dimension,
    pub brand_score: u8,
    pub best_competitor_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerTracker {
    pub scorecard: Scorecard,
    pub strengths: Vec<DimensionComparison>,
    pub gaps: Vec<DimensionComparison>,
    pub priority_fixes: Vec<PriorityFix>,
}

/// The single object a run returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_report: Option<WeeklyReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_radar: Option<CulturalRadar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_tracker: Option<PeerTracker>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    #[serde(default)]
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sections_are_omitted() {
        let result = AnalysisResult {
            cultural_radar: Some(CulturalRadar::default()),
            ..AnalysisResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("cultural_radar"));
        assert!(!obj.contains_key("weekly_report"));
        assert!(!obj.contains_key("peer_tracker"));
        assert!(obj.contains_key("warnings"));
        assert!(obj.contains_key("provenance"));
    }

    #[test]
    fn dimension_names_serialize_verbatim() {
        let json = serde_json::to_string(&Dimension::ALL).unwrap();
        assert_eq!(
            json,
            r#"["Homepage","PDP","Checkout","ContentCommunity","MobileUX","PricePresentation"]"#
        );
    }

    #[test]
    fn null_delta_is_serialized() {
        let overview = MentionsOverview {
            this_window: 3,
            prev_window: 0,
            delta_pct: None,
            delta_note: Some("undefined".to_string()),
        };
        let json = serde_json::to_value(&overview).unwrap();
        assert!(json["delta_pct"].is_null());
    }

    #[test]
    fn insight_kind_serializes_as_type() {
        let insight = MentionInsight {
            kind: InsightKind::Risk,
            competitor: None,
            insight: "x".to_string(),
            action: "y".to_string(),
            impact: Impact::High,
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "risk");
        assert_eq!(json["impact"], "high");
        assert!(json.get("competitor").is_none());
    }
}
