//! Streetwear-vocabulary sentiment over brand mentions.

use std::cmp::Reverse;

use signalscale_core::{CustomerSentiment, Intent, RawRecord};

use crate::context::AnalysisContext;
use crate::text::{excerpt, MatchText};
use crate::Analyzer;

const POSITIVE: &[&str] = &[
    "love", "amazing", "fire", "heat", "fresh", "clean", "dope", "sick", "hard", "goes hard",
    "slaps", "hits different", "quality", "worth it", "recommend", "cop", "must have", "grail",
    "iconic", "classic", "timeless", "perfect",
];

const NEGATIVE: &[&str] = &[
    "trash", "wack", "mid", "overpriced", "cheap", "poor quality", "disappointed", "waste",
    "regret", "fake", "knockoff", "overrated", "not worth", "skip", "pass", "terrible",
];

/// Words that amplify every indicator in the same text.
const CONTEXT_MODIFIERS: &[(&str, f64)] = &[
    ("fit", 0.1),
    ("drop", 0.15),
    ("collab", 0.2),
    ("quality", 0.25),
    ("price", 0.2),
    ("style", 0.15),
];

const INDICATOR_WEIGHT: f64 = 0.3;
const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Exemplars kept per bucket.
const EXEMPLARS: usize = 3;
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Score `text` in `[-1.0, 1.0]`.
#[must_use]
pub fn sentiment_score(text: &MatchText) -> f64 {
    let modifier = 1.0
        + CONTEXT_MODIFIERS
            .iter()
            .filter(|(word, _)| text.has(word))
            .map(|(_, weight)| weight)
            .sum::<f64>();
    let positives = text.count(POSITIVE);
    let negatives = text.count(NEGATIVE);
    #[allow(clippy::cast_precision_loss)]
    let net = positives as f64 - negatives as f64;
    (net * INDICATOR_WEIGHT * modifier).clamp(-1.0, 1.0)
}

#[must_use]
pub fn classify(score: f64) -> Polarity {
    if score >= POSITIVE_THRESHOLD {
        Polarity::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        Polarity::Negative
    } else {
        Polarity::Neutral
    }
}

/// Buckets current-window brand mentions by polarity.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentAnalyzer;

impl Analyzer for SentimentAnalyzer {
    type Output = CustomerSentiment;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> CustomerSentiment {
        let mut buckets: [Vec<(usize, &RawRecord)>; 3] = Default::default();

        for (idx, record) in records.iter().enumerate() {
            if record.intent != Intent::Mentions || !ctx.in_current_window(record.observed_at) {
                continue;
            }
            if record.text().is_none() {
                continue;
            }
            let bucket = match classify(sentiment_score(&MatchText::from_record(record))) {
                Polarity::Positive => 0,
                Polarity::Negative => 1,
                Polarity::Neutral => 2,
            };
            buckets[bucket].push((idx, record));
        }

        let mut sentiment = CustomerSentiment::default();
        sentiment.counts.positive = buckets[0].len() as u64;
        sentiment.counts.negative = buckets[1].len() as u64;
        sentiment.counts.neutral = buckets[2].len() as u64;

        let [positive, negative, neutral] = buckets;
        sentiment.positive = exemplars(positive);
        sentiment.negative = exemplars(negative);
        sentiment.neutral = exemplars(neutral);

        tracing::debug!(
            positive = sentiment.counts.positive,
            negative = sentiment.counts.negative,
            neutral = sentiment.counts.neutral,
            "sentiment analyzed"
        );
        sentiment
    }
}

/// Highest engagement first, then earliest, then input order.
fn exemplars(mut bucket: Vec<(usize, &RawRecord)>) -> Vec<String> {
    bucket.sort_by_key(|(idx, r)| (Reverse(r.metrics.interactions()), r.observed_at, *idx));
    bucket
        .into_iter()
        .filter_map(|(_, r)| r.text().map(|t| excerpt(t, EXCERPT_CHARS)))
        .take(EXEMPLARS)
        .collect()
}
