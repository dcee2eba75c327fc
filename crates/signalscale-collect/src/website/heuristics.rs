//! HTML heuristics evaluated against a brand's homepage and one sample
//! product page.
//!
//! Every catalog id in [`signalscale_core::heuristics::HEURISTICS`] has exactly
//! one detector here. Detection is deliberately shallow: a heuristic passes
//! when its marker is present in the raw markup.

use std::sync::LazyLock;

use regex::Regex;
use signalscale_core::heuristics::HEURISTICS;

/// Largest homepage, in bytes, that still counts as lightweight.
const MAX_LIGHT_PAGE_BYTES: usize = 600_000;
/// Most `<script>` tags a lightweight page may carry.
const MAX_LIGHT_PAGE_SCRIPTS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Product,
    /// Passes when either page shows the marker.
    Either,
}

enum Detect {
    Pattern(Regex),
    AtLeast(Regex, usize),
    Lightweight,
}

struct Detector {
    id: &'static str,
    page: Page,
    detect: Detect,
}

fn re(pattern: &str) -> Regex {
    Regex::new(&format!("(?is){pattern}")).expect("valid heuristic regex")
}

fn pattern(id: &'static str, page: Page, p: &str) -> Detector {
    Detector {
        id,
        page,
        detect: Detect::Pattern(re(p)),
    }
}

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<script\b"));
static PRODUCT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"href\s*=\s*["']([^"'#?]*/products/[^"'#?]+)["']"#));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<title[^>]*>(.*?)</title>"));

static DETECTORS: LazyLock<Vec<Detector>> = LazyLock::new(|| {
    vec![
        pattern("homepage.hero_clarity", Page::Home, r#"class\s*=\s*["'][^"']*\bhero\b|<h1[^>]*>\s*[^<\s]"#),
        pattern("homepage.new_drop_surfacing", Page::Home, r"\b(new arrivals?|just dropped|new in|latest drop|shop new)\b"),
        Detector {
            id: "homepage.load_performance",
            page: Page::Home,
            detect: Detect::Lightweight,
        },
        pattern("homepage.nav_clarity", Page::Home, r"<nav\b"),
        pattern("homepage.merchandising", Page::Home, r#"href\s*=\s*["'][^"']*/collections/"#),
        Detector {
            id: "pdp.media_richness",
            page: Page::Product,
            detect: Detect::AtLeast(re(r"<(img|video)\b"), 4),
        },
        pattern("pdp.details_depth", Page::Product, r"\b(materials?|composition|care instructions|fabric|product details)\b"),
        pattern("pdp.reviews_ugc", Page::Product, r"\b(reviews?|rated|yotpo|judge\.me|okendo)\b"),
        pattern("pdp.size_fit", Page::Product, r"\b(size guide|size chart|fit guide|true to size|model is wearing)\b"),
        pattern("pdp.cross_sell", Page::Product, r"\b(you may also like|complete the look|related products|pairs well with|recommended for you)\b"),
        pattern("checkout.express_pay", Page::Either, r"\b(shop pay|apple pay|google pay|paypal|afterpay|klarna)\b"),
        pattern("checkout.guest_checkout", Page::Either, r"\b(guest checkout|checkout as (a )?guest|continue as guest|no account needed)\b"),
        pattern("checkout.checkout_steps", Page::Either, r"\b(one[- ]page checkout|express checkout|buy it now|quick checkout)\b"),
        pattern("checkout.pricing_clarity", Page::Either, r"\b(taxes? included|duties included|calculated at checkout|no hidden fees)\b"),
        pattern("content.ugc", Page::Home, r"\b(tag us|as seen on|customer photos|shop the feed|instagram feed)\b"),
        pattern("content.collaborations", Page::Either, r"\b(collabs?|collaborations?|capsule|in partnership with)\b"),
        pattern("content.editorial", Page::Home, r#"\b(journal|editorial|lookbook)\b|href\s*=\s*["'][^"']*/blogs?/"#),
        pattern("content.community", Page::Home, r"\b(newsletter|join the (club|community|crew)|rewards|loyalty|discord)\b"),
        pattern("mobile.responsive", Page::Home, r#"<meta[^>]+name\s*=\s*["']viewport["']"#),
        Detector {
            id: "mobile.tap_targets",
            page: Page::Home,
            detect: Detect::AtLeast(re(r"<button\b"), 3),
        },
        pattern("mobile.navigation_ease", Page::Home, r#"\b(hamburger|menu-toggle|mobile-menu|nav-toggle|menu-drawer)\b|aria-label\s*=\s*["']menu["']"#),
        pattern("mobile.performance", Page::Home, r#"loading\s*=\s*["']lazy["']|rel\s*=\s*["']preload["']"#),
        pattern("price.entry_price", Page::Either, r"\b(from|starting at)\s*[$€£]\s?\d"),
        pattern("price.hero_price_anchoring", Page::Either, r"<(s|del|strike)\b|compare[-_ ]at|\bwas\s*[$€£]\s?\d"),
        pattern("price.promo", Page::Either, r"\b(\d{1,2}\s?% off|sale|promo code|discount)\b"),
        pattern("price.shipping", Page::Either, r"\b(free shipping|shipping (calculated|policy|rates)|ships free|free delivery)\b"),
    ]
});

fn detect(detect: &Detect, html: &str) -> bool {
    match detect {
        Detect::Pattern(re) => re.is_match(html),
        Detect::AtLeast(re, min) => re.find_iter(html).nth(min.saturating_sub(1)).is_some(),
        Detect::Lightweight => {
            html.len() <= MAX_LIGHT_PAGE_BYTES
                && SCRIPT_RE.find_iter(html).count() <= MAX_LIGHT_PAGE_SCRIPTS
        }
    }
}

/// Ids of passed heuristics, in catalog order.
///
/// Product-page heuristics cannot pass without a product page.
pub fn evaluate(home: &str, product: Option<&str>) -> Vec<String> {
    let passed = |d: &Detector| match d.page {
        Page::Home => detect(&d.detect, home),
        Page::Product => product.is_some_and(|p| detect(&d.detect, p)),
        Page::Either => {
            detect(&d.detect, home) || product.is_some_and(|p| detect(&d.detect, p))
        }
    };
    HEURISTICS
        .iter()
        .filter(|spec| {
            DETECTORS
                .iter()
                .find(|d| d.id == spec.id)
                .is_some_and(&passed)
        })
        .map(|spec| spec.id.to_string())
        .collect()
}

/// First `/products/` link on the page, resolved against `base`.
pub fn find_product_link(html: &str, base: &str) -> Option<String> {
    PRODUCT_LINK_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
        .find_map(|href| crate::client::resolve(base, &href))
}

/// Page `<title>` with tags and surplus whitespace removed.
pub fn page_title(html: &str) -> Option<String> {
    let title = crate::text::strip_html(TITLE_RE.captures(html)?.get(1)?.as_str());
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"<html><head><title>Acme | Streetwear</title>
        <meta name="viewport" content="width=device-width"></head>
        <body><nav><a href="/collections/new">New Arrivals</a></nav>
        <section class="banner hero"><h1>Summer Drop</h1></section>
        <a href="/products/heavy-tee">Tee</a></body></html>"#;

    #[test]
    fn every_catalog_heuristic_has_a_detector() {
        for spec in HEURISTICS {
            assert!(
                DETECTORS.iter().any(|d| d.id == spec.id),
                "no detector for {}",
                spec.id
            );
        }
        assert_eq!(DETECTORS.len(), HEURISTICS.len());
    }

    #[test]
    fn homepage_markers_pass() {
        let passed = evaluate(HOME, None);
        for id in [
            "homepage.hero_clarity",
            "homepage.new_drop_surfacing",
            "homepage.load_performance",
            "homepage.nav_clarity",
            "homepage.merchandising",
            "mobile.responsive",
        ] {
            assert!(passed.iter().any(|p| p == id), "{id} should pass");
        }
        assert!(!passed.iter().any(|p| p.starts_with("pdp.")));
    }

    #[test]
    fn product_page_markers_pass() {
        let pdp = r#"<img src=1><img src=2><img src=3><video></video>
            <p>Materials: 100% cotton</p><div>128 reviews</div>
            <a>Size guide</a><h3>You may also like</h3><s>$90</s> $70"#;
        let passed = evaluate("<html></html>", Some(pdp));
        for id in [
            "pdp.media_richness",
            "pdp.details_depth",
            "pdp.reviews_ugc",
            "pdp.size_fit",
            "pdp.cross_sell",
            "price.hero_price_anchoring",
        ] {
            assert!(passed.iter().any(|p| p == id), "{id} should pass");
        }
    }

    #[test]
    fn media_richness_needs_four_items() {
        let passed = evaluate("", Some("<img><img><img>"));
        assert!(!passed.iter().any(|p| p == "pdp.media_richness"));
    }

    #[test]
    fn passed_ids_follow_catalog_order() {
        let passed = evaluate(HOME, None);
        let positions: Vec<usize> = passed
            .iter()
            .map(|id| HEURISTICS.iter().position(|h| h.id == id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn product_link_resolved_against_site() {
        assert_eq!(
            find_product_link(HOME, "https://acme.example").as_deref(),
            Some("https://acme.example/products/heavy-tee")
        );
        assert!(find_product_link("<a href='/pages/about'>", "https://acme.example").is_none());
    }

    #[test]
    fn title_is_cleaned() {
        assert_eq!(page_title(HOME).as_deref(), Some("Acme | Streetwear"));
        assert!(page_title("<title> </title>").is_none());
    }
}
