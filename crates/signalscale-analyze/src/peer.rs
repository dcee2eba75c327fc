//! Website scorecard from site audit records.

use signalscale_core::heuristics::{self, HeuristicSpec};
use signalscale_core::{Dimension, Intent, PeerScoreEntry, RawRecord, Scorecard};

use crate::context::AnalysisContext;
use crate::Analyzer;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Failure notes kept per entry.
const MAX_NOTES: usize = 2;

/// Scores each audited brand on every dimension.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeerScorer;

impl Analyzer for PeerScorer {
    type Output = Scorecard;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> Scorecard {
        let brands: Vec<String> = ctx.subjects().into_iter().map(str::to_owned).collect();
        let mut scores = Vec::new();

        for brand in &brands {
            // First audit wins if a site was somehow audited twice.
            let Some(audit) = records.iter().find(|r| {
                r.intent == Intent::SiteAudit && r.subject.as_deref() == Some(brand.as_str())
            }) else {
                tracing::debug!(brand = %brand, "no site audit, brand left unscored");
                continue;
            };
            for dimension in Dimension::ALL {
                scores.push(score_dimension(dimension, brand, audit));
            }
        }

        Scorecard {
            dimensions: Dimension::ALL.to_vec(),
            brands,
            scores,
        }
    }
}

/// Sum of passed heuristic points, clamped to `1..=10`.
#[must_use]
pub fn score_dimension(dimension: Dimension, brand: &str, audit: &RawRecord) -> PeerScoreEntry {
    let passed = |h: &HeuristicSpec| audit.heuristics.iter().any(|id| id == h.id);

    let points: u32 = heuristics::for_dimension(dimension)
        .filter(|h| passed(h))
        .map(|h| u32::from(h.points))
        .sum();
    let score = u8::try_from(points.min(u32::from(MAX_SCORE)))
        .unwrap_or(MAX_SCORE)
        .max(MIN_SCORE);

    let mut notes: Vec<String> = heuristics::for_dimension(dimension)
        .filter(|h| !passed(h))
        .take(MAX_NOTES)
        .map(|h| h.failure_note.to_owned())
        .collect();
    if notes.is_empty() {
        notes.push(heuristics::all_pass_note(dimension).to_owned());
    }

    PeerScoreEntry {
        dimension,
        brand: brand.to_owned(),
        score,
        notes,
        source_url: audit.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use signalscale_core::SourceKind;

    use super::*;
    use crate::context::fixtures::{as_of, ctx};

    fn audit(brand: &str, url: &str, passed: &[&str]) -> RawRecord {
        let mut r = RawRecord::new(SourceKind::Website, "site", url, Intent::SiteAudit, as_of());
        r.subject = Some(brand.to_owned());
        r.heuristics = passed.iter().map(|h| (*h).to_owned()).collect();
        r
    }

    fn all_ids(prefix: &str) -> Vec<&'static str> {
        heuristics::HEURISTICS
            .iter()
            .filter(|h| h.id.starts_with(prefix))
            .map(|h| h.id)
            .collect()
    }

    #[test]
    fn nothing_passed_floors_to_one() {
        let entry = score_dimension(Dimension::Checkout, "Acme", &audit("Acme", "https://acme.example", &[]));
        assert_eq!(entry.score, 1);
        assert_eq!(entry.notes.len(), 2);
        assert_eq!(entry.notes[0], "Limited express payment options");
        assert_eq!(entry.source_url, "https://acme.example");
    }

    #[test]
    fn everything_passed_scores_ten_with_all_pass_note() {
        let ids = all_ids("pdp.");
        let entry = score_dimension(Dimension::Pdp, "Acme", &audit("Acme", "https://acme.example", &ids));
        assert_eq!(entry.score, 10);
        assert_eq!(entry.notes, vec![heuristics::all_pass_note(Dimension::Pdp)]);
    }

    #[test]
    fn partial_pass_sums_points_and_cites_failures() {
        let record = audit(
            "Acme",
            "https://acme.example",
            &["homepage.hero_clarity", "homepage.nav_clarity"],
        );
        let entry = score_dimension(Dimension::Homepage, "Acme", &record);
        assert_eq!(entry.score, 4);
        assert_eq!(
            entry.notes,
            vec![
                "New drops not prominently featured",
                "Page load performance below optimal"
            ]
        );
    }

    #[test]
    fn scorecard_covers_audited_brands_only() {
        let records = vec![
            audit("Beta", "https://beta.example", &all_ids("checkout.")),
            audit("Acme", "https://acme.example", &[]),
        ];
        let card = PeerScorer.analyze(&records, &ctx());
        assert_eq!(card.brands, vec!["Acme", "Beta", "Gamma"]);
        assert_eq!(card.dimensions.len(), 6);
        assert_eq!(card.scores.len(), 12);
        assert_eq!(card.score(Dimension::Checkout, "Beta"), Some(10));
        assert_eq!(card.score(Dimension::Checkout, "Acme"), Some(1));
        assert_eq!(card.score(Dimension::Checkout, "Gamma"), None);
        assert!(card.scores.iter().all(|e| (MIN_SCORE..=MAX_SCORE).contains(&e.score)));
        assert_eq!(card.scores[0].brand, "Acme");
    }

    #[test]
    fn unknown_heuristic_ids_are_ignored() {
        let record = audit("Acme", "https://acme.example", &["homepage.bogus"]);
        assert_eq!(score_dimension(Dimension::Homepage, "Acme", &record).score, 1);
    }
}
