//! Analysis request model and its pre-execution validation.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest look-back window a run may request.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Name words too common to count as a brand mention on their own.
const NAME_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "inc", "llc", "ltd", "company", "brand", "brands",
    "clothing", "apparel", "official", "store", "shop",
];

/// Optional brand metadata used to widen search terms and keyword matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandMeta {
    pub aliases: Vec<String>,
    pub hashtags: Vec<String>,
    /// Domains to restrict social search to, e.g. `tiktok.com`.
    pub priority_platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub meta: Option<BrandMeta>,
}

impl Brand {
    /// Lowercased terms that count as a mention of this brand.
    ///
    /// Includes the full name, each name word of 3+ characters that is not a
    /// common filler word, aliases and hashtags (without `#`). Order is stable
    /// and duplicates are removed.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        let mut push = |term: String| {
            let term = term.trim().to_string();
            if !term.is_empty() && !keywords.contains(&term) {
                keywords.push(term);
            }
        };

        let name = self.name.to_lowercase();
        push(name.clone());
        for word in name.split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.chars().count() >= 3 && !NAME_STOPWORDS.contains(&word.as_str()) {
                push(word);
            }
        }
        if let Some(meta) = &self.meta {
            for alias in &meta.aliases {
                push(alias.to_lowercase());
            }
            for tag in &meta.hashtags {
                push(tag.trim_start_matches('#').to_lowercase());
            }
        }
        keywords
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Which output sections a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    WeeklyReport,
    CulturalRadar,
    PeerTracker,
    All,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::WeeklyReport => "weekly_report",
            Mode::CulturalRadar => "cultural_radar",
            Mode::PeerTracker => "peer_tracker",
            Mode::All => "all",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly_report" => Ok(Mode::WeeklyReport),
            "cultural_radar" => Ok(Mode::CulturalRadar),
            "peer_tracker" => Ok(Mode::PeerTracker),
            "all" => Ok(Mode::All),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// Inclusive price range parsed from strings like `"$40–$150"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    /// Parse `"$40–$150"`, `"40-150"` or `"$1,000 - $2,500"`.
    ///
    /// Returns `None` when the string has no two-sided numeric range.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
            .collect();
        let (lo, hi) = cleaned
            .split_once('–')
            .or_else(|| cleaned.split_once('—'))
            .or_else(|| cleaned.split_once('-'))?;
        let min = lo.parse::<f64>().ok()?;
        let max = hi.parse::<f64>().ok()?;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

fn default_mode() -> String {
    "all".to_string()
}

fn default_window_days() -> u32 {
    7
}

fn default_influencer_max_followers() -> u64 {
    100_000
}

fn default_min_engagement_rate() -> f64 {
    0.05
}

fn default_price_band() -> String {
    "$40–$150".to_string()
}

fn default_max_competitors() -> usize {
    8
}

fn default_max_results_per_section() -> usize {
    10
}

/// A run request as received from the request layer, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub brand: Brand,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_influencer_max_followers")]
    pub influencer_max_followers: u64,
    #[serde(default = "default_min_engagement_rate")]
    pub min_engagement_rate: f64,
    #[serde(default = "default_price_band")]
    pub price_band: String,
    #[serde(default = "default_max_competitors")]
    pub max_competitors: usize,
    #[serde(default = "default_max_results_per_section")]
    pub max_results_per_section: usize,
}

impl AnalysisRequest {
    /// Request for `brand` with every other field at its default.
    #[must_use]
    pub fn for_brand(brand: &str) -> Self {
        Self {
            brand: Brand {
                name: brand.to_string(),
                url: None,
                meta: None,
            },
            competitors: Vec::new(),
            mode: default_mode(),
            window_days: default_window_days(),
            influencer_max_followers: default_influencer_max_followers(),
            min_engagement_rate: default_min_engagement_rate(),
            price_band: default_price_band(),
            max_competitors: default_max_competitors(),
            max_results_per_section: default_max_results_per_section(),
        }
    }

    /// Check every field and produce the immutable request a run operates on.
    ///
    /// The mode is checked first so an unknown mode fails before anything
    /// else is looked at. Competitors are truncated to `max_competitors`
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an unknown mode, empty names or
    /// out-of-range numeric parameters.
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let mode: Mode = self.mode.trim().parse()?;

        if self.brand.name.trim().is_empty() {
            return Err(ValidationError::EmptyBrandName);
        }
        if let Some(pos) = self
            .competitors
            .iter()
            .position(|c| c.name.trim().is_empty())
        {
            return Err(ValidationError::EmptyCompetitorName(pos));
        }
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ValidationError::OutOfRange {
                field: "window_days",
                reason: format!("{} not in 1..={MAX_WINDOW_DAYS}", self.window_days),
            });
        }
        if self.influencer_max_followers == 0 {
            return Err(ValidationError::OutOfRange {
                field: "influencer_max_followers",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.min_engagement_rate.is_finite()
            || !(0.0..=1.0).contains(&self.min_engagement_rate)
        {
            return Err(ValidationError::OutOfRange {
                field: "min_engagement_rate",
                reason: format!("{} not in 0.0..=1.0", self.min_engagement_rate),
            });
        }
        if self.max_competitors == 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_competitors",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_results_per_section == 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_results_per_section",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut competitors = self.competitors;
        competitors.truncate(self.max_competitors);
        let price_band = PriceBand::parse(&self.price_band);

        Ok(ValidatedRequest {
            brand: self.brand,
            competitors,
            mode,
            window_days: self.window_days,
            influencer_max_followers: self.influencer_max_followers,
            min_engagement_rate: self.min_engagement_rate,
            price_band_label: self.price_band,
            price_band,
            max_competitors: self.max_competitors,
            max_results_per_section: self.max_results_per_section,
        })
    }
}

/// An accepted request. Owned by exactly one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub brand: Brand,
    /// Already truncated to `max_competitors`.
    pub competitors: Vec<Competitor>,
    pub mode: Mode,
    pub window_days: u32,
    pub influencer_max_followers: u64,
    pub min_engagement_rate: f64,
    pub price_band_label: String,
    /// `None` when the label could not be parsed as a range.
    pub price_band: Option<PriceBand>,
    pub max_competitors: usize,
    pub max_results_per_section: usize,
}

impl ValidatedRequest {
    #[must_use]
    pub fn competitor_names(&self) -> Vec<String> {
        self.competitors.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
