//! Creator discovery and influence scoring for the cultural radar.

use std::cmp::Reverse;
use std::collections::HashMap;

use signalscale_core::{
    Activation, ContentFocus, CreatorCandidate, Intent, RawRecord, Recommendation, SourceKind,
};

use crate::context::AnalysisContext;
use crate::text::{thousands, MatchText};
use crate::Analyzer;

/// Engagement rate treated as the ceiling when normalising.
pub const ER_CEILING: f64 = 0.20;

const ER_WEIGHT: f64 = 0.5;
const RELEVANCY_WEIGHT: f64 = 0.3;
const ALIGNMENT_WEIGHT: f64 = 0.2;

pub const SEED_MIN_SCORE: u8 = 70;
pub const COLLAB_MIN_SCORE: u8 = 50;

const STREETWEAR_KEYWORDS: &[&str] = &[
    "streetwear", "urban", "street style", "hypebeast", "sneakers", "grails", "fit check", "ootd",
    "drip", "fresh", "clean", "vintage", "thrift", "archive", "rare", "limited edition",
];

const TRENDING_HASHTAGS: &[&str] = &[
    "#streetwear", "#ootd", "#fitcheck", "#hypebeast", "#sneakers", "#grails", "#vintage",
    "#thrift", "#drip", "#fresh", "#trending", "#viral", "#fyp", "#foryou",
];

const TREND_KEYWORDS: &[&str] = &[
    "trending", "viral", "hot", "fire", "heat", "must have", "cop", "drop", "release", "collab",
    "collaboration", "capsule", "collection", "exclusive",
];

const STREETWEAR_FOCUS: &[&str] = &["streetwear", "urban", "street style"];
const FASHION_FOCUS: &[&str] = &["fashion", "style", "outfit"];
const MUSIC_FOCUS: &[&str] = &["music", "hip hop", "rap"];

/// Posts from one author on one platform.
#[derive(Debug)]
pub struct CreatorProfile<'a> {
    pub handle: &'a str,
    pub platform: &'a str,
    pub posts: Vec<&'a RawRecord>,
    /// All post text and hashtags, combined.
    pub text: MatchText,
    pub focus: ContentFocus,
}

impl<'a> CreatorProfile<'a> {
    fn new(handle: &'a str, platform: &'a str, posts: Vec<&'a RawRecord>) -> Self {
        let combined: Vec<String> = posts
            .iter()
            .map(|p| {
                let mut t = p.text().unwrap_or_default().to_owned();
                for tag in &p.hashtags {
                    t.push(' ');
                    t.push_str(tag);
                }
                t
            })
            .collect();
        let text = MatchText::new(&combined.join(" "));
        let focus = content_focus(&text);
        Self {
            handle,
            platform,
            posts,
            text,
            focus,
        }
    }

    #[must_use]
    pub fn followers(&self) -> Option<u64> {
        self.posts.iter().filter_map(|p| p.metrics.followers).max()
    }

    /// Mean engagement rate over posts that report one.
    #[must_use]
    pub fn engagement_rate(&self) -> Option<f64> {
        let rates: Vec<f64> = self
            .posts
            .iter()
            .filter_map(|p| p.metrics.engagement_rate)
            .filter(|r| r.is_finite() && *r >= 0.0)
            .collect();
        if rates.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        Some(mean)
    }

    fn hashtags(&self) -> impl Iterator<Item = &str> {
        self.posts
            .iter()
            .flat_map(|p| p.hashtags.iter().map(String::as_str))
    }
}

#[must_use]
pub fn content_focus(text: &MatchText) -> ContentFocus {
    if text.has_any(STREETWEAR_FOCUS) {
        ContentFocus::Streetwear
    } else if text.has_any(FASHION_FOCUS) {
        ContentFocus::Fashion
    } else if text.has_any(MUSIC_FOCUS) {
        ContentFocus::Music
    } else {
        ContentFocus::Lifestyle
    }
}

/// Brand fit and cultural alignment, each on `0.0..=100.0`.
pub trait RelevanceModel: Send + Sync + std::fmt::Debug {
    fn relevancy(&self, creator: &CreatorProfile<'_>, ctx: &AnalysisContext) -> f64;
    fn alignment(&self, creator: &CreatorProfile<'_>, ctx: &AnalysisContext) -> f64;
}

/// Keyword and hashtag overlap with streetwear and trend vocabularies.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordOverlap;

#[allow(clippy::cast_precision_loss)]
impl RelevanceModel for KeywordOverlap {
    fn relevancy(&self, creator: &CreatorProfile<'_>, ctx: &AnalysisContext) -> f64 {
        let streetwear = (creator.text.count(STREETWEAR_KEYWORDS) as f64 * 8.0).min(40.0);
        let brand_hits = ctx
            .brand_keywords
            .iter()
            .filter(|k| creator.text.has(k))
            .count();
        let brand = (brand_hits as f64 * 15.0).min(30.0);
        let focus = match creator.focus {
            ContentFocus::Streetwear | ContentFocus::Fashion => 30.0,
            ContentFocus::Music | ContentFocus::Lifestyle => 20.0,
        };
        (streetwear + brand + focus).min(100.0)
    }

    fn alignment(&self, creator: &CreatorProfile<'_>, ctx: &AnalysisContext) -> f64 {
        let mut tags: Vec<String> = creator.hashtags().map(str::to_lowercase).collect();
        tags.sort();
        tags.dedup();
        let trending = tags
            .iter()
            .filter(|t| TRENDING_HASHTAGS.contains(&t.as_str()))
            .count();
        let hashtag_points = (trending as f64 * 8.0).min(40.0);
        let keyword_points = (creator.text.count(TREND_KEYWORDS) as f64 * 6.0).min(30.0);
        (hashtag_points + keyword_points + posting_activity(creator, ctx)).min(100.0)
    }
}

/// Recency of the latest post plus posting frequency, `0..=30`.
#[allow(clippy::cast_precision_loss)]
fn posting_activity(creator: &CreatorProfile<'_>, ctx: &AnalysisContext) -> f64 {
    let Some(latest) = creator.posts.iter().map(|p| p.observed_at).max() else {
        return 0.0;
    };
    let recency = match (ctx.as_of - latest).num_days() {
        ..=1 => 20.0,
        2..=3 => 15.0,
        4..=7 => 10.0,
        _ => 5.0,
    };
    let weeks = (f64::from(ctx.window_days) * 2.0 / 7.0).max(1.0);
    let per_week = creator.posts.len() as f64 / weeks;
    recency + (per_week * 2.0).min(10.0)
}

/// `round(0.5 * er_norm + 0.3 * relevancy + 0.2 * alignment)` on `0..=100`,
/// where `er_norm = min(er / 0.20, 1) * 100`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn influence_score(engagement_rate: f64, relevancy: f64, alignment: f64) -> u8 {
    let er_norm = (engagement_rate / ER_CEILING).clamp(0.0, 1.0) * 100.0;
    let raw = ER_WEIGHT * er_norm
        + RELEVANCY_WEIGHT * relevancy.clamp(0.0, 100.0)
        + ALIGNMENT_WEIGHT * alignment.clamp(0.0, 100.0);
    raw.round().clamp(0.0, 100.0) as u8
}

#[must_use]
pub fn recommend(tier: u8, score: u8) -> Recommendation {
    match (tier, score) {
        (1, s) if s >= SEED_MIN_SCORE => Recommendation::Seed,
        (1, s) if s >= COLLAB_MIN_SCORE => Recommendation::Collab,
        _ => Recommendation::Monitor,
    }
}

/// Scores creators found in social posts.
#[derive(Debug)]
pub struct InfluenceScorer {
    relevance: Box<dyn RelevanceModel>,
}

impl Default for InfluenceScorer {
    fn default() -> Self {
        Self::with_model(Box::new(KeywordOverlap))
    }
}

impl InfluenceScorer {
    #[must_use]
    pub fn with_model(relevance: Box<dyn RelevanceModel>) -> Self {
        Self { relevance }
    }

    fn candidate(
        &self,
        profile: &CreatorProfile<'_>,
        ctx: &AnalysisContext,
    ) -> Option<CreatorCandidate> {
        let followers = profile.followers().filter(|f| *f > 0)?;
        let engagement_rate = profile.engagement_rate()?;
        if followers > ctx.max_followers || engagement_rate < ctx.min_engagement_rate {
            return None;
        }

        let brand_mentioned = ctx.mentions_brand(&profile.text);
        let tier = if brand_mentioned { 1 } else { 2 };
        let influence_score = influence_score(
            engagement_rate,
            self.relevance.relevancy(profile, ctx),
            self.relevance.alignment(profile, ctx),
        );

        let mut evidence: Vec<String> = Vec::new();
        for post in &profile.posts {
            if !evidence.contains(&post.url) {
                evidence.push(post.url.clone());
            }
        }
        let profile_url = profile
            .posts
            .iter()
            .find_map(|p| p.author_url.clone())
            .or_else(|| evidence.first().cloned())
            .unwrap_or_default();

        Some(CreatorCandidate {
            handle: profile.handle.to_owned(),
            platform: profile.platform.to_owned(),
            profile_url,
            followers,
            engagement_rate,
            brand_mentioned,
            content_focus: profile.focus,
            tier,
            recommendation: recommend(tier, influence_score),
            influence_score,
            evidence,
        })
    }
}

impl Analyzer for InfluenceScorer {
    /// Ranked by influence score, highest first. Not capped.
    type Output = Vec<CreatorCandidate>;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> Vec<CreatorCandidate> {
        let mut order: Vec<(&str, &str)> = Vec::new();
        let mut groups: HashMap<(&str, &str), Vec<&RawRecord>> = HashMap::new();
        for record in records {
            if record.source != SourceKind::Social
                || !matches!(record.intent, Intent::Mentions | Intent::Creators)
            {
                continue;
            }
            let Some(author) = record.author.as_deref().map(str::trim).filter(|a| !a.is_empty())
            else {
                continue;
            };
            let key = (record.platform.as_str(), author);
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(record);
        }

        let mut creators: Vec<CreatorCandidate> = order
            .into_iter()
            .filter_map(|key| {
                let posts = groups.remove(&key)?;
                let profile = CreatorProfile::new(key.1, key.0, posts);
                self.candidate(&profile, ctx)
            })
            .collect();
        creators.sort_by_key(|c| Reverse(c.influence_score));

        tracing::debug!(creators = creators.len(), "creators scored");
        creators
    }
}

/// Up to `n` seed/collab creators, highest influence first, with the reason
/// each was picked.
#[must_use]
pub fn top_activations(creators: &[CreatorCandidate], n: usize) -> Vec<Activation> {
    let mut picked: Vec<&CreatorCandidate> = creators
        .iter()
        .filter(|c| matches!(c.recommendation, Recommendation::Seed | Recommendation::Collab))
        .collect();
    picked.sort_by_key(|c| Reverse(c.influence_score));
    picked
        .into_iter()
        .take(n)
        .map(|c| Activation {
            handle: c.handle.clone(),
            platform: c.platform.clone(),
            profile_url: c.profile_url.clone(),
            influence_score: c.influence_score,
            action: c.recommendation,
            why: activation_reason(c),
        })
        .collect()
}

fn activation_reason(c: &CreatorCandidate) -> String {
    let er = c.engagement_rate * 100.0;
    let focus = focus_label(c.content_focus);
    if c.brand_mentioned {
        format!(
            "Already engaged with brand, high influence score ({}), {er:.1}% ER",
            c.influence_score
        )
    } else if c.influence_score >= 80 {
        format!(
            "High influence potential ({}), {focus} focus, {} followers",
            c.influence_score,
            thousands(c.followers)
        )
    } else if c.engagement_rate >= 0.05 {
        format!("Strong engagement ({er:.1}% ER), relevant {focus} content")
    } else {
        format!(
            "Emerging creator with {} influence score, {focus} alignment",
            c.influence_score
        )
    }
}

fn focus_label(focus: ContentFocus) -> &'static str {
    match focus {
        ContentFocus::Streetwear => "streetwear",
        ContentFocus::Fashion => "fashion",
        ContentFocus::Music => "music",
        ContentFocus::Lifestyle => "lifestyle",
    }
}

#[cfg(test)]
#[path = "influence_test.rs"]
mod tests;
