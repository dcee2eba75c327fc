//! Cross-platform theme detection.
//!
//! A theme is a hashtag or a catalog phrase. It only becomes a trend once it
//! has been seen on at least two distinct platforms.

use std::collections::{BTreeSet, HashMap};

use signalscale_core::{Intent, Momentum, RawRecord, TrendSignal};

use crate::context::AnalysisContext;
use crate::text::{normalize, MatchText};
use crate::Analyzer;

pub const MIN_PLATFORMS: usize = 2;

const EVIDENCE_PER_THEME: usize = 3;

/// Phrase catalog grouped by category.
pub const CATALOG: &[(&str, &[&str])] = &[
    (
        "aesthetics",
        &[
            "y2k", "grunge", "minimalist", "maximalist", "vintage", "retro", "futuristic",
            "cyberpunk", "cottagecore", "dark academia",
        ],
    ),
    (
        "styles",
        &[
            "oversized", "cropped", "baggy", "fitted", "layered", "deconstructed",
            "reconstructed", "patchwork", "distressed",
        ],
    ),
    (
        "items",
        &[
            "cargo pants", "wide leg", "mom jeans", "platform shoes", "chunky sneakers",
            "bucket hat", "beanie", "tote bag", "crossbody", "fanny pack", "hoodie", "crewneck",
        ],
    ),
    (
        "colors",
        &[
            "neon", "pastel", "earth tones", "monochrome", "tie dye", "gradient", "holographic",
            "metallic", "matte black",
        ],
    ),
    (
        "collaborations",
        &[
            "collab", "collaboration", "limited edition", "exclusive", "capsule", "collection",
            "drop",
        ],
    ),
];

const RISING: &[&str] = &[
    "trending", "viral", "blowing up", "taking off", "hot right now", "everyone wearing",
    "new wave", "emerging", "up and coming",
];

const STABLE: &[&str] = &[
    "classic", "timeless", "staple", "essential", "always", "consistent", "reliable", "go-to",
    "standard",
];

const DECLINING: &[&str] = &[
    "over", "done", "played out", "outdated", "last season", "not cool anymore", "dead trend",
    "moving on from",
];

/// Reach hashtags that say nothing about the content.
const GENERIC_TAGS: &[&str] = &["fyp", "foryou", "foryoupage", "viral", "trending", "explore"];

#[derive(Debug, Default)]
struct ThemeStats<'a> {
    first_seen: usize,
    platforms: BTreeSet<&'a str>,
    records: Vec<&'a RawRecord>,
}

/// Themes corroborated across platforms within the current window.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendAnalyzer;

impl Analyzer for TrendAnalyzer {
    /// Ranked by platform count, then mentions, then theme name. Not capped.
    type Output = Vec<TrendSignal>;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> Vec<TrendSignal> {
        let excluded: Vec<String> = ctx
            .brand_keywords
            .iter()
            .cloned()
            .chain(ctx.competitors.iter().map(String::as_str).map(normalize))
            .collect();

        let mut themes: HashMap<String, ThemeStats<'_>> = HashMap::new();
        for record in records {
            if !matches!(
                record.intent,
                Intent::Mentions | Intent::Creators | Intent::Culture
            ) || !ctx.in_current_window(record.observed_at)
            {
                continue;
            }
            for theme in themes_in(record) {
                if excluded.contains(&theme) {
                    continue;
                }
                let next = themes.len();
                let stats = themes.entry(theme).or_insert_with(|| ThemeStats {
                    first_seen: next,
                    ..ThemeStats::default()
                });
                stats.platforms.insert(record.platform.as_str());
                stats.records.push(record);
            }
        }

        let mut signals: Vec<(usize, TrendSignal)> = themes
            .into_iter()
            .filter(|(_, s)| s.platforms.len() >= MIN_PLATFORMS)
            .map(|(theme, s)| {
                let mut evidence: Vec<String> = Vec::new();
                for r in &s.records {
                    if evidence.len() == EVIDENCE_PER_THEME {
                        break;
                    }
                    if !evidence.contains(&r.url) {
                        evidence.push(r.url.clone());
                    }
                }
                let signal = TrendSignal {
                    momentum: momentum(&s.records),
                    mentions: s.records.len() as u64,
                    platforms: s.platforms.iter().map(|p| (*p).to_owned()).collect(),
                    evidence,
                    theme,
                };
                (s.first_seen, signal)
            })
            .collect();

        signals.sort_by(|(ia, a), (ib, b)| {
            b.platforms
                .len()
                .cmp(&a.platforms.len())
                .then(b.mentions.cmp(&a.mentions))
                .then_with(|| a.theme.cmp(&b.theme))
                .then(ia.cmp(ib))
        });
        tracing::debug!(trends = signals.len(), "trends analyzed");
        signals.into_iter().map(|(_, s)| s).collect()
    }
}

/// Distinct normalised themes carried by one record.
fn themes_in(record: &RawRecord) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for tag in &record.hashtags {
        let theme = normalize(tag);
        if theme.chars().count() >= 2
            && !GENERIC_TAGS.contains(&theme.as_str())
            && !found.contains(&theme)
        {
            found.push(theme);
        }
    }

    let text = MatchText::from_record(record);
    for (_, phrases) in CATALOG {
        for phrase in *phrases {
            if text.has(phrase) {
                let theme = normalize(phrase);
                if !found.contains(&theme) {
                    found.push(theme);
                }
            }
        }
    }
    found
}

/// Catalog category of `theme`, if it is a catalog phrase.
#[must_use]
pub fn category_of(theme: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| normalize(p) == theme))
        .map(|(category, _)| *category)
}

fn momentum(records: &[&RawRecord]) -> Momentum {
    let (mut rising, mut stable, mut declining) = (0, 0, 0);
    for record in records {
        let text = MatchText::from_record(record);
        rising += text.count(RISING);
        stable += text.count(STABLE);
        declining += text.count(DECLINING);
    }
    if rising > declining && rising >= stable {
        Momentum::Rising
    } else if declining > rising && declining >= stable {
        Momentum::Declining
    } else {
        Momentum::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::{ctx, days_ago, post};

    fn tagged(url: &str, platform: &str, text: &str, tags: &[&str]) -> RawRecord {
        let mut r = post(url, platform, text, days_ago(1));
        r.hashtags = tags.iter().map(|t| (*t).to_owned()).collect();
        r
    }

    #[test]
    fn single_platform_theme_is_not_a_trend() {
        let records = vec![
            tagged("https://tiktok.com/1", "tiktok", "y2k everything", &[]),
            tagged("https://tiktok.com/2", "tiktok", "so y2k", &[]),
        ];
        assert!(TrendAnalyzer.analyze(&records, &ctx()).is_empty());
    }

    #[test]
    fn hashtag_and_phrase_merge_into_one_theme() {
        let records = vec![
            tagged("https://tiktok.com/1", "tiktok", "fit check", &["#y2k"]),
            tagged("https://instagram.com/1", "instagram", "very y2k energy", &[]),
        ];
        let trends = TrendAnalyzer.analyze(&records, &ctx());
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].theme, "y2k");
        assert_eq!(trends[0].platforms, vec!["instagram", "tiktok"]);
        assert_eq!(trends[0].mentions, 2);
        assert_eq!(trends[0].evidence.len(), 2);
    }

    #[test]
    fn brand_and_generic_tags_are_excluded() {
        let records = vec![
            tagged("https://tiktok.com/1", "tiktok", "", &["#acme", "#fyp", "#beta"]),
            tagged("https://instagram.com/1", "instagram", "", &["#acme", "#fyp", "#beta"]),
        ];
        assert!(TrendAnalyzer.analyze(&records, &ctx()).is_empty());
    }

    #[test]
    fn stale_records_are_ignored() {
        let mut old = tagged("https://instagram.com/1", "instagram", "bucket hat", &[]);
        old.observed_at = days_ago(9);
        let records = vec![tagged("https://tiktok.com/1", "tiktok", "bucket hat", &[]), old];
        assert!(TrendAnalyzer.analyze(&records, &ctx()).is_empty());
    }

    #[test]
    fn ranking_prefers_breadth_then_volume_then_name() {
        let records = vec![
            tagged("https://a.com/1", "a", "hoodie beanie", &[]),
            tagged("https://b.com/1", "b", "hoodie beanie neon", &[]),
            tagged("https://c.com/1", "c", "neon", &[]),
            tagged("https://c.com/2", "c", "hoodie", &[]),
            tagged("https://a.com/2", "a", "neon", &[]),
        ];
        let trends = TrendAnalyzer.analyze(&records, &ctx());
        let themes: Vec<_> = trends.iter().map(|t| t.theme.as_str()).collect();
        // hoodie: 3 platforms 3 mentions; neon: 3 platforms 3 mentions; beanie: 2 platforms
        assert_eq!(themes, vec!["hoodie", "neon", "beanie"]);
    }

    #[test]
    fn momentum_follows_phrases() {
        let rising = vec![
            tagged("https://a.com/1", "a", "cargo pants are blowing up", &[]),
            tagged("https://b.com/1", "b", "cargo pants trending again", &[]),
        ];
        assert_eq!(TrendAnalyzer.analyze(&rising, &ctx())[0].momentum, Momentum::Rising);

        let declining = vec![
            tagged("https://a.com/1", "a", "cargo pants are played out", &[]),
            tagged("https://b.com/1", "b", "cargo pants feel outdated", &[]),
        ];
        assert_eq!(
            TrendAnalyzer.analyze(&declining, &ctx())[0].momentum,
            Momentum::Declining
        );

        let flat = vec![
            tagged("https://a.com/1", "a", "cargo pants", &[]),
            tagged("https://b.com/1", "b", "cargo pants", &[]),
        ];
        assert_eq!(TrendAnalyzer.analyze(&flat, &ctx())[0].momentum, Momentum::Stable);
    }

    #[test]
    fn category_lookup() {
        assert_eq!(category_of("cargo pants"), Some("items"));
        assert_eq!(category_of("tie dye"), Some("colors"));
        assert_eq!(category_of("ootd"), None);
    }
}
