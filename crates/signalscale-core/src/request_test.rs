use super::*;

fn competitors(names: &[&str]) -> Vec<Competitor> {
    names
        .iter()
        .map(|n| Competitor {
            name: (*n).to_string(),
            url: None,
        })
        .collect()
}

#[test]
fn mode_parses_known_values() {
    assert_eq!("weekly_report".parse::<Mode>().unwrap(), Mode::WeeklyReport);
    assert_eq!("cultural_radar".parse::<Mode>().unwrap(), Mode::CulturalRadar);
    assert_eq!("peer_tracker".parse::<Mode>().unwrap(), Mode::PeerTracker);
    assert_eq!("all".parse::<Mode>().unwrap(), Mode::All);
}

#[test]
fn unknown_mode_is_rejected_first() {
    // Empty brand name would also fail, but mode is checked before anything else.
    let mut req = AnalysisRequest::for_brand("");
    req.mode = "monthly".to_string();
    assert_eq!(
        req.validate().unwrap_err(),
        ValidationError::UnknownMode("monthly".to_string())
    );
}

#[test]
fn empty_brand_name_rejected() {
    let req = AnalysisRequest::for_brand("   ");
    assert_eq!(req.validate().unwrap_err(), ValidationError::EmptyBrandName);
}

#[test]
fn empty_competitor_name_reports_position() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.competitors = competitors(&["Beta", " "]);
    assert_eq!(
        req.validate().unwrap_err(),
        ValidationError::EmptyCompetitorName(1)
    );
}

#[test]
fn zero_window_days_rejected() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.window_days = 0;
    assert!(matches!(
        req.validate(),
        Err(ValidationError::OutOfRange {
            field: "window_days",
            ..
        })
    ));
}

#[test]
fn engagement_rate_above_one_rejected() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.min_engagement_rate = 1.5;
    assert!(matches!(
        req.validate(),
        Err(ValidationError::OutOfRange {
            field: "min_engagement_rate",
            ..
        })
    ));
}

#[test]
fn nan_engagement_rate_rejected() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.min_engagement_rate = f64::NAN;
    assert!(req.validate().is_err());
}

#[test]
fn zero_result_cap_rejected() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.max_results_per_section = 0;
    assert!(matches!(
        req.validate(),
        Err(ValidationError::OutOfRange {
            field: "max_results_per_section",
            ..
        })
    ));
}

#[test]
fn competitors_truncated_in_input_order() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.competitors = competitors(&["Beta", "Gamma", "Delta", "Epsilon"]);
    req.max_competitors = 2;
    let validated = req.validate().unwrap();
    assert_eq!(validated.competitor_names(), vec!["Beta", "Gamma"]);
}

#[test]
fn defaults_applied_when_deserializing() {
    let req: AnalysisRequest =
        serde_json::from_str(r#"{"brand": {"name": "Acme"}}"#).unwrap();
    assert_eq!(req.mode, "all");
    assert_eq!(req.window_days, 7);
    assert_eq!(req.influencer_max_followers, 100_000);
    assert!((req.min_engagement_rate - 0.05).abs() < f64::EPSILON);
    assert_eq!(req.price_band, "$40–$150");
    assert_eq!(req.max_competitors, 8);
    assert_eq!(req.max_results_per_section, 10);
    assert!(req.competitors.is_empty());
}

#[test]
fn yaml_request_with_meta_deserializes() {
    let yaml = r"
brand:
  name: Acme Apparel
  url: https://acme.example
  meta:
    aliases: [acmewear]
    hashtags: ['#acmefit']
competitors:
  - name: Beta
    url: https://beta.example
mode: peer_tracker
";
    let req: AnalysisRequest = serde_yaml::from_str(yaml).unwrap();
    let validated = req.validate().unwrap();
    assert_eq!(validated.mode, Mode::PeerTracker);
    assert_eq!(validated.competitors.len(), 1);
    let meta = validated.brand.meta.as_ref().unwrap();
    assert_eq!(meta.aliases, vec!["acmewear"]);
    assert!(meta.priority_platforms.is_empty());
}

#[test]
fn brand_keywords_include_words_aliases_and_hashtags() {
    let brand = Brand {
        name: "Crooks & Castles".to_string(),
        url: None,
        meta: Some(BrandMeta {
            aliases: vec!["C&C".to_string()],
            hashtags: vec!["#CrooksNation".to_string()],
            priority_platforms: Vec::new(),
        }),
    };
    assert_eq!(
        brand.keywords(),
        vec!["crooks & castles", "crooks", "castles", "c&c", "crooksnation"]
    );
}

#[test]
fn brand_keywords_skip_filler_words() {
    let brand = Brand {
        name: "The North Face".to_string(),
        url: None,
        meta: None,
    };
    assert_eq!(brand.keywords(), vec!["the north face", "north", "face"]);

    let brand = Brand {
        name: "Fear of God Clothing Co".to_string(),
        url: None,
        meta: None,
    };
    assert_eq!(
        brand.keywords(),
        vec!["fear of god clothing co", "fear", "god"]
    );
}

#[test]
fn price_band_parses_en_dash_and_hyphen() {
    let band = PriceBand::parse("$40–$150").unwrap();
    assert!((band.min - 40.0).abs() < f64::EPSILON);
    assert!((band.max - 150.0).abs() < f64::EPSILON);

    let band = PriceBand::parse("$1,000 - $2,500").unwrap();
    assert!((band.min - 1000.0).abs() < f64::EPSILON);
    assert!((band.max - 2500.0).abs() < f64::EPSILON);
}

#[test]
fn price_band_rejects_single_value_and_inverted_range() {
    assert!(PriceBand::parse("$99").is_none());
    assert!(PriceBand::parse("$150-$40").is_none());
    assert!(PriceBand::parse("cheap").is_none());
}

#[test]
fn unparseable_price_band_is_not_a_validation_error() {
    let mut req = AnalysisRequest::for_brand("Acme");
    req.price_band = "premium".to_string();
    let validated = req.validate().unwrap();
    assert!(validated.price_band.is_none());
    assert_eq!(validated.price_band_label, "premium");
}
