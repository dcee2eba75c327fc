use std::cmp::Reverse;
use std::collections::HashSet;

use signalscale_core::{EngagementHighlight, Intent, MentionsOverview, RawRecord, SourceKind};

use crate::context::AnalysisContext;
use crate::text::excerpt;
use crate::Analyzer;

/// Interactions a post needs to be highlighted.
pub const HIGHLIGHT_MIN_INTERACTIONS: u64 = 50;

pub const UNDEFINED_DELTA_NOTE: &str = "undefined increase: no mentions in previous window";

const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSummary {
    pub overview: MentionsOverview,
    /// Ranked by interactions, highest first. Not capped.
    pub highlights: Vec<EngagementHighlight>,
}

/// Mention volume across the two windows plus standout posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngagementAnalyzer;

impl Analyzer for EngagementAnalyzer {
    type Output = EngagementSummary;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> EngagementSummary {
        let mentions = records.iter().filter(|r| r.intent == Intent::Mentions);
        let mut this_window = 0_u64;
        let mut prev_window = 0_u64;
        for record in mentions {
            if ctx.in_current_window(record.observed_at) {
                this_window += 1;
            } else if ctx.in_previous_window(record.observed_at) {
                prev_window += 1;
            }
        }

        EngagementSummary {
            overview: mentions_overview(this_window, prev_window),
            highlights: highlights(records, ctx),
        }
    }
}

/// Window-over-window change.
///
/// Both windows empty is a flat `0.0`. An empty previous window with new
/// mentions has no defined percentage, so `delta_pct` is `None` with a note.
#[must_use]
pub fn mentions_overview(this_window: u64, prev_window: u64) -> MentionsOverview {
    let (delta_pct, delta_note) = match (prev_window, this_window) {
        (0, 0) => (Some(0.0), None),
        (0, _) => (None, Some(UNDEFINED_DELTA_NOTE.to_owned())),
        (prev, this) => {
            #[allow(clippy::cast_precision_loss)]
            let pct = (this as f64 - prev as f64) / prev as f64 * 100.0;
            (Some((pct * 10.0).round() / 10.0), None)
        }
    };
    MentionsOverview {
        this_window,
        prev_window,
        delta_pct,
        delta_note,
    }
}

fn highlights(records: &[RawRecord], ctx: &AnalysisContext) -> Vec<EngagementHighlight> {
    let mut picked: Vec<(u64, &RawRecord)> = records
        .iter()
        .filter(|r| r.source == SourceKind::Social)
        .filter(|r| matches!(r.intent, Intent::Mentions | Intent::Creators))
        .filter(|r| ctx.in_current_window(r.observed_at))
        .map(|r| (r.metrics.interactions(), r))
        .filter(|(n, _)| *n >= HIGHLIGHT_MIN_INTERACTIONS)
        .collect();
    // Stable: equal interactions keep input order.
    picked.sort_by_key(|(n, _)| Reverse(*n));

    let mut seen = HashSet::new();
    picked.retain(|(_, r)| seen.insert(r.url.clone()));
    picked
        .into_iter()
        .map(|(interactions, r)| EngagementHighlight {
            platform: r.platform.clone(),
            url: r.url.clone(),
            author: r.author.clone(),
            interactions,
            excerpt: r.text().map(|t| excerpt(t, EXCERPT_CHARS)).unwrap_or_default(),
        })
        .collect()
}
