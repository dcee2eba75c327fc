//! Final invariant check on an assembled result.

use signalscale_core::{AnalysisResult, Recommendation, ValidatedRequest};

use crate::assemble::TOP_ACTIVATIONS;
use crate::error::InvariantError;
use crate::router::Sections;

const MAX_EXEMPLARS: usize = 3;

/// Request bounds a result must respect.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub cap: usize,
    pub max_followers: u64,
    pub min_engagement_rate: f64,
}

impl Limits {
    #[must_use]
    pub fn from_request(request: &ValidatedRequest) -> Self {
        Self {
            cap: request.max_results_per_section,
            max_followers: request.influencer_max_followers,
            min_engagement_rate: request.min_engagement_rate,
        }
    }
}

/// Check `result` against the requested `sections` and the request `limits`.
///
/// # Errors
///
/// Returns [`InvariantError`] listing every violation found.
pub fn validate(
    result: &AnalysisResult,
    sections: Sections,
    limits: Limits,
) -> Result<(), InvariantError> {
    let cap = limits.cap;
    let mut v: Vec<String> = Vec::new();
    let mut has_data = false;

    let presence = [
        ("weekly_report", sections.weekly_report, result.weekly_report.is_some()),
        ("cultural_radar", sections.cultural_radar, result.cultural_radar.is_some()),
        ("peer_tracker", sections.peer_tracker, result.peer_tracker.is_some()),
    ];
    for (name, wanted, present) in presence {
        if wanted != present {
            v.push(format!(
                "section {name} {}",
                if wanted { "missing" } else { "not requested" }
            ));
        }
    }

    let mut check_cap = |name: &str, len: usize, limit: usize| {
        if len > limit {
            v.push(format!("{name} has {len} entries, cap is {limit}"));
        }
    };

    if let Some(weekly) = &result.weekly_report {
        check_cap("engagement_highlights", weekly.engagement_highlights.len(), cap);
        check_cap("trends", weekly.trends.len(), cap);
        check_cap("competitive_mentions", weekly.competitive_mentions.len(), cap);
        check_cap("opportunities_risks", weekly.opportunities_risks.len(), cap);
        let sentiment = &weekly.customer_sentiment;
        check_cap("positive exemplars", sentiment.positive.len(), MAX_EXEMPLARS);
        check_cap("negative exemplars", sentiment.negative.len(), MAX_EXEMPLARS);
        check_cap("neutral exemplars", sentiment.neutral.len(), MAX_EXEMPLARS);
        has_data |= weekly.brand_mentions_overview.this_window > 0
            || weekly.brand_mentions_overview.prev_window > 0
            || !weekly.engagement_highlights.is_empty()
            || !weekly.trends.is_empty();
    }
    if let Some(radar) = &result.cultural_radar {
        check_cap("creators", radar.creators.len(), cap);
        check_cap("top_3_to_activate", radar.top_3_to_activate.len(), TOP_ACTIVATIONS);
        has_data |= !radar.creators.is_empty();
    }
    if let Some(peer) = &result.peer_tracker {
        check_cap("strengths", peer.strengths.len(), cap);
        check_cap("gaps", peer.gaps.len(), cap);
        check_cap("priority_fixes", peer.priority_fixes.len(), cap);
        has_data |= !peer.scorecard.scores.is_empty();
    }

    if let Some(radar) = &result.cultural_radar {
        for c in &radar.creators {
            if c.influence_score > 100 {
                v.push(format!("creator {} influence score {} > 100", c.handle, c.influence_score));
            }
            if c.followers > limits.max_followers {
                v.push(format!(
                    "creator {} has {} followers, max is {}",
                    c.handle, c.followers, limits.max_followers
                ));
            }
            if c.engagement_rate < limits.min_engagement_rate {
                v.push(format!(
                    "creator {} engagement rate {} below {}",
                    c.handle, c.engagement_rate, limits.min_engagement_rate
                ));
            }
            if !c.evidence.iter().any(|url| result.provenance.contains(url)) {
                v.push(format!("creator {} has no evidence in provenance", c.handle));
            }
        }
        for a in &radar.top_3_to_activate {
            if !matches!(a.action, Recommendation::Seed | Recommendation::Collab) {
                v.push(format!("activation {} is not seed or collab", a.handle));
            }
            if !radar
                .creators
                .iter()
                .any(|c| c.handle == a.handle && c.platform == a.platform)
            {
                v.push(format!("activation {} is not a listed creator", a.handle));
            }
        }
    }
    if let Some(peer) = &result.peer_tracker {
        for e in &peer.scorecard.scores {
            if !(1..=10).contains(&e.score) {
                v.push(format!("{} {} score {} outside 1..=10", e.brand, e.dimension, e.score));
            }
            if !result.provenance.contains(&e.source_url) {
                v.push(format!("{} {} source {} not in provenance", e.brand, e.dimension, e.source_url));
            }
        }
    }

    if has_data && result.provenance.is_empty() {
        v.push("provenance empty while sections carry data".to_owned());
    }

    if v.is_empty() {
        Ok(())
    } else {
        Err(InvariantError { violations: v })
    }
}
