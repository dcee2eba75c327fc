//! Mode → sources and search terms.

use signalscale_collect::text::MARKETPLACES;
use signalscale_core::{Intent, Mode, QueryTerm, SourceKind, ValidatedRequest};

/// Output sections a mode produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub weekly_report: bool,
    pub cultural_radar: bool,
    pub peer_tracker: bool,
}

impl Sections {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            weekly_report: matches!(mode, Mode::WeeklyReport | Mode::All),
            cultural_radar: matches!(mode, Mode::CulturalRadar | Mode::All),
            peer_tracker: matches!(mode, Mode::PeerTracker | Mode::All),
        }
    }

    /// Sources needed, in priority order.
    #[must_use]
    pub fn sources(self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|s| match s {
                SourceKind::Social | SourceKind::Trend => self.weekly_report || self.cultural_radar,
                SourceKind::Ecommerce => self.weekly_report,
                SourceKind::Website => self.peer_tracker,
            })
            .collect()
    }
}

/// One planned collection: a source and the terms to issue against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub source: SourceKind,
    pub terms: Vec<QueryTerm>,
}

/// Deterministic collection plan for `request`.
#[must_use]
pub fn plan(request: &ValidatedRequest) -> Vec<Route> {
    let sections = Sections::for_mode(request.mode);
    sections
        .sources()
        .into_iter()
        .map(|source| Route {
            source,
            terms: terms_for(source, sections, request),
        })
        .collect()
}

fn terms_for(source: SourceKind, sections: Sections, request: &ValidatedRequest) -> Vec<QueryTerm> {
    let brand = request.brand.name.as_str();
    match source {
        SourceKind::Social => {
            let mut terms = vec![QueryTerm::new(Intent::Mentions, brand_query(request)).about(brand)];
            if sections.cultural_radar {
                terms.extend(
                    creator_queries(&request.price_band_label)
                        .into_iter()
                        .map(|q| QueryTerm::new(Intent::Creators, q)),
                );
            }
            terms
        }
        SourceKind::Ecommerce => std::iter::once(brand)
            .chain(request.competitors.iter().map(|c| c.name.as_str()))
            .map(|name| QueryTerm::new(Intent::Listings, listing_query(name)).about(name))
            .collect(),
        SourceKind::Website | SourceKind::Trend => Vec::new(),
    }
}

/// `"Acme" OR "acme nyc" OR #acmefits`, optionally limited to priority platforms.
#[must_use]
pub fn brand_query(request: &ValidatedRequest) -> String {
    let mut parts = vec![format!("\"{}\"", request.brand.name.trim())];
    let mut platforms: Vec<String> = Vec::new();
    if let Some(meta) = &request.brand.meta {
        for alias in meta.aliases.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
            parts.push(format!("\"{alias}\""));
        }
        for tag in meta
            .hashtags
            .iter()
            .map(|t| t.trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty())
        {
            parts.push(format!("#{tag}"));
        }
        platforms = meta
            .priority_platforms
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| format!("site:{p}"))
            .collect();
    }
    parts.dedup();

    let query = parts.join(" OR ");
    if platforms.is_empty() {
        query
    } else {
        format!("({query}) ({})", platforms.join(" OR "))
    }
}

/// Creator discovery searches scoped to the price band.
#[must_use]
pub fn creator_queries(price_band: &str) -> Vec<String> {
    vec![
        format!("streetwear {price_band} outfit"),
        format!("fashion {price_band} style"),
        format!("street style {price_band}"),
        format!("urban fashion {price_band}"),
    ]
}

#[must_use]
pub fn listing_query(name: &str) -> String {
    let sites: Vec<String> = MARKETPLACES
        .iter()
        .map(|(domain, _)| format!("site:{domain}"))
        .collect();
    format!("\"{}\" ({})", name.trim(), sites.join(" OR "))
}

#[cfg(test)]
mod tests {
    use signalscale_core::{AnalysisRequest, BrandMeta, Competitor};

    use super::*;

    fn request(mode: &str) -> ValidatedRequest {
        let mut req = AnalysisRequest::for_brand("Acme");
        req.mode = mode.to_owned();
        req.competitors = vec![Competitor {
            name: "Beta".to_owned(),
            url: Some("https://beta.example".to_owned()),
        }];
        req.validate().unwrap()
    }

    fn sources(mode: &str) -> Vec<SourceKind> {
        plan(&request(mode)).into_iter().map(|r| r.source).collect()
    }

    #[test]
    fn routing_table() {
        use SourceKind::{Ecommerce, Social, Trend, Website};
        assert_eq!(sources("weekly_report"), vec![Social, Ecommerce, Trend]);
        assert_eq!(sources("cultural_radar"), vec![Social, Trend]);
        assert_eq!(sources("peer_tracker"), vec![Website]);
        assert_eq!(sources("all"), vec![Social, Ecommerce, Website, Trend]);
    }

    #[test]
    fn all_is_the_union_of_sections() {
        let all = Sections::for_mode(Mode::All);
        assert!(all.weekly_report && all.cultural_radar && all.peer_tracker);
        let weekly = Sections::for_mode(Mode::WeeklyReport);
        assert!(weekly.weekly_report && !weekly.cultural_radar && !weekly.peer_tracker);
    }

    #[test]
    fn creator_terms_only_for_radar() {
        let weekly = plan(&request("weekly_report"));
        assert!(weekly[0].terms.iter().all(|t| t.intent == Intent::Mentions));

        let radar = plan(&request("cultural_radar"));
        let creators: Vec<_> = radar[0]
            .terms
            .iter()
            .filter(|t| t.intent == Intent::Creators)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(creators.len(), 4);
        assert_eq!(creators[0], "streetwear $40–$150 outfit");
    }

    #[test]
    fn listing_terms_cover_brand_and_competitors() {
        let weekly = plan(&request("weekly_report"));
        let listings = &weekly[1].terms;
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].subject.as_deref(), Some("Beta"));
        assert!(listings[1].text.starts_with("\"Beta\" (site:amazon.com OR "));
    }

    #[test]
    fn brand_query_uses_meta() {
        let mut req = AnalysisRequest::for_brand("Acme");
        req.brand.meta = Some(BrandMeta {
            aliases: vec!["Acme NYC".to_owned()],
            hashtags: vec!["#acmefits".to_owned()],
            priority_platforms: vec!["tiktok.com".to_owned()],
        });
        let req = req.validate().unwrap();
        assert_eq!(
            brand_query(&req),
            "(\"Acme\" OR \"Acme NYC\" OR #acmefits) (site:tiktok.com)"
        );
        assert_eq!(brand_query(&request("all")), "\"Acme\"");
    }
}
