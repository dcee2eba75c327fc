//! Turns analyzer outputs into the capped result sections.

use std::cmp::Reverse;

use signalscale_analyze::{
    top_activations, AnalysisContext, Analyzer, EngagementAnalyzer, InfluenceScorer,
    InsightAnalyzer, PeerScorer, SentimentAnalyzer, TrendAnalyzer,
};
use signalscale_core::heuristics;
use signalscale_core::{
    CreatorCandidate, CulturalRadar, DimensionComparison, Impact, PeerTracker, PriorityFix,
    Provenance, RawRecord, Scorecard, WeeklyReport,
};

use crate::router::Sections;

/// Activations listed on the cultural radar.
pub const TOP_ACTIVATIONS: usize = 3;

/// Smallest competitor lead that becomes a priority fix.
pub const PRIORITY_FIX_MIN_GAP: u8 = 2;

/// Gap at which a priority fix is high impact.
const HIGH_IMPACT_GAP: u8 = 3;

pub struct Assembler<'a> {
    pub ctx: &'a AnalysisContext,
    pub records: &'a [RawRecord],
    /// Creators and scores citing nothing in here are left out.
    pub provenance: &'a Provenance,
    pub cap: usize,
    pub influence: &'a InfluenceScorer,
}

/// Result sections for a run; absent sections are `None`.
#[derive(Debug, Default)]
pub struct Assembled {
    pub weekly_report: Option<WeeklyReport>,
    pub cultural_radar: Option<CulturalRadar>,
    pub peer_tracker: Option<PeerTracker>,
}

impl Assembler<'_> {
    #[must_use]
    pub fn assemble(&self, sections: Sections) -> Assembled {
        Assembled {
            weekly_report: sections.weekly_report.then(|| self.weekly_report()),
            cultural_radar: sections.cultural_radar.then(|| self.cultural_radar()),
            peer_tracker: sections.peer_tracker.then(|| self.peer_tracker()),
        }
    }

    fn weekly_report(&self) -> WeeklyReport {
        let (records, ctx) = (self.records, self.ctx);
        let engagement = EngagementAnalyzer.analyze(records, ctx);
        let customer_sentiment = SentimentAnalyzer.analyze(records, ctx);
        let trends = TrendAnalyzer.analyze(records, ctx);
        let insights = InsightAnalyzer {
            trends: &trends,
            sentiment: customer_sentiment.counts,
        }
        .analyze(records, ctx);

        WeeklyReport {
            brand_mentions_overview: engagement.overview,
            customer_sentiment,
            engagement_highlights: capped(engagement.highlights, self.cap),
            trends: capped(trends, self.cap),
            competitive_mentions: capped(insights.competitive_mentions, self.cap),
            opportunities_risks: capped(insights.opportunities_risks, self.cap),
        }
    }

    fn cultural_radar(&self) -> CulturalRadar {
        let creators = traceable_creators(
            self.influence.analyze(self.records, self.ctx),
            self.provenance,
        );
        let creators = capped(creators, self.cap);
        let top_3_to_activate = top_activations(&creators, TOP_ACTIVATIONS);
        CulturalRadar {
            creators,
            top_3_to_activate,
        }
    }

    fn peer_tracker(&self) -> PeerTracker {
        let mut scorecard = PeerScorer.analyze(self.records, self.ctx);
        retain_traceable_scores(&mut scorecard, self.provenance);
        let comparisons = compare(&scorecard, &self.ctx.brand);

        let mut strengths: Vec<DimensionComparison> = comparisons
            .iter()
            .filter(|(c, _)| c.brand_score > c.best_competitor_score)
            .map(|(c, _)| c.clone())
            .collect();
        strengths.sort_by_key(|c| Reverse(c.brand_score - c.best_competitor_score));

        let mut gaps: Vec<DimensionComparison> = comparisons
            .iter()
            .filter(|(c, _)| c.brand_score < c.best_competitor_score)
            .map(|(c, _)| c.clone())
            .collect();
        gaps.sort_by_key(|c| Reverse(c.best_competitor_score - c.brand_score));

        let mut priority_fixes: Vec<PriorityFix> = comparisons
            .into_iter()
            .filter_map(|(c, best_competitor)| {
                let gap = c.best_competitor_score.checked_sub(c.brand_score)?;
                (gap >= PRIORITY_FIX_MIN_GAP).then(|| PriorityFix {
                    dimension: c.dimension,
                    brand_score: c.brand_score,
                    best_competitor,
                    competitor_score: c.best_competitor_score,
                    gap,
                    impact: if gap >= HIGH_IMPACT_GAP {
                        Impact::High
                    } else {
                        Impact::Medium
                    },
                    recommendation: heuristics::fix_recommendation(c.dimension).to_owned(),
                })
            })
            .collect();
        priority_fixes.sort_by_key(|f| Reverse(f.gap));

        PeerTracker {
            scorecard,
            strengths: capped(strengths, self.cap),
            gaps: capped(gaps, self.cap),
            priority_fixes: capped(priority_fixes, self.cap),
        }
    }
}

/// Per dimension, the brand's score against the best competitor's, with that
/// competitor's name. Dimensions where either side is unscored are skipped.
/// Ties between competitors go to the one listed first.
fn compare(scorecard: &Scorecard, brand: &str) -> Vec<(DimensionComparison, String)> {
    scorecard
        .dimensions
        .iter()
        .filter_map(|&dimension| {
            let brand_score = scorecard.score(dimension, brand)?;
            let (best, best_score) = scorecard
                .brands
                .iter()
                .filter(|b| b.as_str() != brand)
                .filter_map(|b| scorecard.score(dimension, b).map(|s| (b, s)))
                .fold(None, |best: Option<(&String, u8)>, (b, s)| match best {
                    Some((_, top)) if top >= s => best,
                    _ => Some((b, s)),
                })?;
            Some((
                DimensionComparison {
                    dimension,
                    brand_score,
                    best_competitor_score: best_score,
                },
                best.clone(),
            ))
        })
        .collect()
}

/// Evidence narrowed to recorded URLs; creators left with none are dropped.
fn traceable_creators(
    creators: Vec<CreatorCandidate>,
    provenance: &Provenance,
) -> Vec<CreatorCandidate> {
    creators
        .into_iter()
        .filter_map(|mut c| {
            c.evidence.retain(|url| provenance.contains(url));
            if c.evidence.is_empty() {
                tracing::debug!(handle = %c.handle, platform = %c.platform, "creator without traceable evidence dropped");
                return None;
            }
            Some(c)
        })
        .collect()
}

fn retain_traceable_scores(scorecard: &mut Scorecard, provenance: &Provenance) {
    scorecard.scores.retain(|e| {
        let traced = provenance.contains(&e.source_url);
        if !traced {
            tracing::debug!(brand = %e.brand, dimension = %e.dimension, source_url = %e.source_url, "untraceable score dropped");
        }
        traced
    });
}

fn capped<T>(mut items: Vec<T>, cap: usize) -> Vec<T> {
    items.truncate(cap);
    items
}
