//! Competitive mentions plus opportunities and risks for the weekly report.

use std::cmp::Reverse;

use signalscale_core::{
    Impact, InsightKind, Intent, MentionInsight, Momentum, RawRecord, SentimentCounts,
    TrendSignal,
};

use crate::context::AnalysisContext;
use crate::text::MatchText;
use crate::Analyzer;

/// Negative share of classified mentions above which a risk is raised.
pub const NEGATIVE_SHARE_RISK: f64 = 0.30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    /// Ranked by mention count, highest first.
    pub competitive_mentions: Vec<MentionInsight>,
    /// Ranked by impact, high first.
    pub opportunities_risks: Vec<MentionInsight>,
}

/// Derives insights from records plus the trend and sentiment results.
#[derive(Debug, Clone, Copy)]
pub struct InsightAnalyzer<'a> {
    pub trends: &'a [TrendSignal],
    pub sentiment: SentimentCounts,
}

impl Analyzer for InsightAnalyzer<'_> {
    type Output = Insights;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> Insights {
        let mut opportunities_risks: Vec<MentionInsight> = self
            .trends
            .iter()
            .filter(|t| t.momentum == Momentum::Rising)
            .map(|t| MentionInsight {
                kind: InsightKind::Opportunity,
                competitor: None,
                insight: format!("Rising trend: {}", t.theme),
                action: format!("Consider incorporating {} into upcoming collections", t.theme),
                impact: Impact::Medium,
            })
            .collect();
        opportunities_risks.extend(pricing_insight(records, ctx));
        opportunities_risks.extend(sentiment_risk(self.sentiment));
        opportunities_risks.sort_by_key(|i| impact_rank(i.impact));

        Insights {
            competitive_mentions: competitive_mentions(records, ctx),
            opportunities_risks,
        }
    }
}

fn impact_rank(impact: Impact) -> u8 {
    match impact {
        Impact::High => 0,
        Impact::Medium => 1,
        Impact::Low => 2,
    }
}

/// Share of voice per competitor across current-window social and culture texts.
fn competitive_mentions(records: &[RawRecord], ctx: &AnalysisContext) -> Vec<MentionInsight> {
    let texts: Vec<MatchText> = records
        .iter()
        .filter(|r| matches!(r.intent, Intent::Mentions | Intent::Creators | Intent::Culture))
        .filter(|r| ctx.in_current_window(r.observed_at))
        .map(MatchText::from_record)
        .filter(|t| !t.is_empty())
        .collect();

    let brand_count = texts.iter().filter(|t| ctx.mentions_brand(t)).count();
    let competitor_counts: Vec<(&str, usize)> = ctx
        .competitors
        .iter()
        .map(|c| (c.as_str(), texts.iter().filter(|t| t.has(c)).count()))
        .collect();
    let total = brand_count + competitor_counts.iter().map(|(_, n)| n).sum::<usize>();

    let mut mentioned: Vec<(&str, usize)> = competitor_counts
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    mentioned.sort_by_key(|(_, n)| Reverse(*n));

    mentioned
        .into_iter()
        .map(|(name, count)| {
            #[allow(clippy::cast_precision_loss)]
            let share = count as f64 / total.max(1) as f64;
            let ahead = count > brand_count;
            MentionInsight {
                kind: if ahead {
                    InsightKind::Risk
                } else {
                    InsightKind::Opportunity
                },
                competitor: Some(name.to_owned()),
                insight: format!(
                    "{name} mentioned in {count} posts this window ({:.0}% share of voice vs {} for {})",
                    share * 100.0,
                    brand_count,
                    ctx.brand
                ),
                action: if ahead {
                    format!("Counter {name}'s momentum with targeted content and creator seeding")
                } else {
                    format!("Monitor {name} conversations for positioning angles")
                },
                impact: if share >= 0.5 {
                    Impact::High
                } else if share >= 0.25 {
                    Impact::Medium
                } else {
                    Impact::Low
                },
            }
        })
        .collect()
}

/// Competitor marketplace prices against the brand's price band.
fn pricing_insight(records: &[RawRecord], ctx: &AnalysisContext) -> Option<MentionInsight> {
    let prices: Vec<f64> = records
        .iter()
        .filter(|r| r.intent == Intent::Listings && ctx.is_competitor_record(r))
        .filter_map(|r| r.metrics.price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    if prices.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;
    let label = &ctx.price_band_label;

    let insight = match ctx.price_band {
        Some(band) if avg > band.max => MentionInsight {
            kind: InsightKind::Opportunity,
            competitor: None,
            insight: format!("Competitors average ${avg:.2} on marketplaces, above the {label} band"),
            action: format!("Position within {label} as the accessible alternative"),
            impact: Impact::High,
        },
        Some(band) if avg < band.min => MentionInsight {
            kind: InsightKind::Risk,
            competitor: None,
            insight: format!("Competitors average ${avg:.2} on marketplaces, below the {label} band"),
            action: "Justify premium with quality and exclusivity messaging".to_owned(),
            impact: Impact::High,
        },
        _ => MentionInsight {
            kind: InsightKind::Opportunity,
            competitor: None,
            insight: format!("Average competitor pricing: ${avg:.2}"),
            action: "Review pricing strategy against competition".to_owned(),
            impact: Impact::Medium,
        },
    };
    Some(insight)
}

fn sentiment_risk(counts: SentimentCounts) -> Option<MentionInsight> {
    let total = counts.total();
    #[allow(clippy::cast_precision_loss)]
    let share = counts.negative as f64 / total.max(1) as f64;
    (total > 0 && share > NEGATIVE_SHARE_RISK).then(|| MentionInsight {
        kind: InsightKind::Risk,
        competitor: None,
        insight: format!("High negative sentiment: {} negative mentions", counts.negative),
        action: "Investigate and address customer concerns".to_owned(),
        impact: Impact::High,
    })
}

#[cfg(test)]
mod tests {
    use signalscale_core::{PriceBand, SourceKind};

    use super::*;
    use crate::context::fixtures::{ctx, days_ago, post};

    fn listing(subject: &str, price: f64) -> RawRecord {
        let mut r = RawRecord::new(
            SourceKind::Ecommerce,
            "stockx",
            format!("https://stockx.com/{subject}-{price}"),
            Intent::Listings,
            days_ago(1),
        );
        r.subject = Some(subject.to_owned());
        r.metrics.price = Some(price);
        r
    }

    fn trend(theme: &str, momentum: Momentum) -> TrendSignal {
        TrendSignal {
            theme: theme.to_owned(),
            mentions: 3,
            platforms: vec!["a".to_owned(), "b".to_owned()],
            momentum,
            evidence: vec![],
        }
    }

    fn analyzer(trends: &[TrendSignal], sentiment: SentimentCounts) -> InsightAnalyzer<'_> {
        InsightAnalyzer { trends, sentiment }
    }

    #[test]
    fn rising_trends_become_opportunities() {
        let trends = vec![trend("y2k", Momentum::Rising), trend("neon", Momentum::Stable)];
        let out = analyzer(&trends, SentimentCounts::default()).analyze(&[], &ctx());
        assert_eq!(out.opportunities_risks.len(), 1);
        assert_eq!(out.opportunities_risks[0].insight, "Rising trend: y2k");
        assert_eq!(out.opportunities_risks[0].impact, Impact::Medium);
    }

    #[test]
    fn negative_share_over_thirty_percent_is_a_high_risk() {
        let heavy = SentimentCounts {
            positive: 3,
            negative: 4,
            neutral: 3,
        };
        let out = analyzer(&[], heavy).analyze(&[], &ctx());
        assert_eq!(out.opportunities_risks[0].kind, InsightKind::Risk);
        assert_eq!(out.opportunities_risks[0].impact, Impact::High);

        let light = SentimentCounts {
            positive: 7,
            negative: 3,
            neutral: 0,
        };
        assert!(analyzer(&[], light).analyze(&[], &ctx()).opportunities_risks.is_empty());
    }

    #[test]
    fn competitor_pricing_above_band_is_an_opportunity() {
        let mut ctx = ctx();
        ctx.price_band = PriceBand::parse("$40–$150");
        let records = vec![listing("Beta", 200.0), listing("Beta", 220.0), listing("Acme", 5.0)];
        let out = analyzer(&[], SentimentCounts::default()).analyze(&records, &ctx);
        let insight = &out.opportunities_risks[0];
        assert_eq!(insight.kind, InsightKind::Opportunity);
        assert!(insight.insight.contains("$210.00"), "{}", insight.insight);
    }

    #[test]
    fn competitor_pricing_below_band_is_a_risk() {
        let mut ctx = ctx();
        ctx.price_band = PriceBand::parse("$40–$150");
        let out = analyzer(&[], SentimentCounts::default()).analyze(&[listing("Gamma", 20.0)], &ctx);
        assert_eq!(out.opportunities_risks[0].kind, InsightKind::Risk);
    }

    #[test]
    fn risks_rank_before_medium_opportunities() {
        let trends = vec![trend("y2k", Momentum::Rising)];
        let counts = SentimentCounts {
            positive: 0,
            negative: 1,
            neutral: 0,
        };
        let out = analyzer(&trends, counts).analyze(&[], &ctx());
        assert_eq!(out.opportunities_risks[0].impact, Impact::High);
        assert_eq!(out.opportunities_risks[1].impact, Impact::Medium);
    }

    #[test]
    fn competitive_mentions_count_share_of_voice() {
        let records = vec![
            post("https://x.com/1", "twitter", "Beta restock was crazy", days_ago(1)),
            post("https://x.com/2", "twitter", "beta vs acme who wins", days_ago(1)),
            post("https://x.com/3", "twitter", "Beta again", days_ago(2)),
            post("https://x.com/4", "twitter", "Gamma hoodie", days_ago(2)),
            post("https://x.com/5", "twitter", "Beta long ago", days_ago(30)),
        ];
        let out = analyzer(&[], SentimentCounts::default()).analyze(&records, &ctx());
        let mentions = &out.competitive_mentions;
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].competitor.as_deref(), Some("Beta"));
        assert_eq!(mentions[0].kind, InsightKind::Risk);
        // 3 of 5 mentions (acme 1, beta 3, gamma 1)
        assert_eq!(mentions[0].impact, Impact::High);
        assert_eq!(mentions[1].competitor.as_deref(), Some("Gamma"));
        assert_eq!(mentions[1].kind, InsightKind::Opportunity);
        assert_eq!(mentions[1].impact, Impact::Low);
    }
}
