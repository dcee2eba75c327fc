//! Fixed website heuristic catalog shared by the website collector and the
//! peer scorer.
//!
//! Heuristic ids are `<dimension prefix>.<name>`. Each heuristic awards its
//! full point value when it passes and nothing otherwise.

use crate::result::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicSpec {
    pub id: &'static str,
    pub dimension: Dimension,
    pub points: u8,
    /// Note attached to a score when this heuristic fails.
    pub failure_note: &'static str,
}

const fn h(
    id: &'static str,
    dimension: Dimension,
    points: u8,
    failure_note: &'static str,
) -> HeuristicSpec {
    HeuristicSpec {
        id,
        dimension,
        points,
        failure_note,
    }
}

pub const HEURISTICS: &[HeuristicSpec] = &[
    h("homepage.hero_clarity", Dimension::Homepage, 2, "Hero section needs clearer messaging"),
    h("homepage.new_drop_surfacing", Dimension::Homepage, 2, "New drops not prominently featured"),
    h("homepage.load_performance", Dimension::Homepage, 2, "Page load performance below optimal"),
    h("homepage.nav_clarity", Dimension::Homepage, 2, "Navigation could be more intuitive"),
    h("homepage.merchandising", Dimension::Homepage, 2, "Product merchandising needs improvement"),
    h("pdp.media_richness", Dimension::Pdp, 2, "Product images/videos need enhancement"),
    h("pdp.details_depth", Dimension::Pdp, 2, "Product details lack depth"),
    h("pdp.reviews_ugc", Dimension::Pdp, 2, "Missing reviews or user-generated content"),
    h("pdp.size_fit", Dimension::Pdp, 2, "Size guide and fit info insufficient"),
    h("pdp.cross_sell", Dimension::Pdp, 2, "Cross-sell opportunities underutilized"),
    h("checkout.express_pay", Dimension::Checkout, 3, "Limited express payment options"),
    h("checkout.guest_checkout", Dimension::Checkout, 3, "Guest checkout not available or unclear"),
    h("checkout.checkout_steps", Dimension::Checkout, 2, "Too many checkout steps"),
    h("checkout.pricing_clarity", Dimension::Checkout, 2, "Pricing and fees not transparent"),
    h("content.ugc", Dimension::ContentCommunity, 3, "Limited user-generated content integration"),
    h("content.collaborations", Dimension::ContentCommunity, 3, "Collaborations not well showcased"),
    h("content.editorial", Dimension::ContentCommunity, 2, "Lacks editorial content or blog"),
    h("content.community", Dimension::ContentCommunity, 2, "Community engagement features missing"),
    h("mobile.responsive", Dimension::MobileUx, 3, "Mobile responsiveness needs improvement"),
    h("mobile.tap_targets", Dimension::MobileUx, 3, "Tap targets too small or poorly spaced"),
    h("mobile.navigation_ease", Dimension::MobileUx, 2, "Mobile navigation difficult to use"),
    h("mobile.performance", Dimension::MobileUx, 2, "Mobile page load speed suboptimal"),
    h("price.entry_price", Dimension::PricePresentation, 3, "Entry-level pricing not clear"),
    h("price.hero_price_anchoring", Dimension::PricePresentation, 3, "Price anchoring strategy unclear"),
    h("price.promo", Dimension::PricePresentation, 2, "Promotions not prominently displayed"),
    h("price.shipping", Dimension::PricePresentation, 2, "Shipping costs not transparent"),
];

/// Heuristics scored for `dimension`, in catalog order.
pub fn for_dimension(dimension: Dimension) -> impl Iterator<Item = &'static HeuristicSpec> {
    HEURISTICS.iter().filter(move |h| h.dimension == dimension)
}

#[must_use]
pub fn find(id: &str) -> Option<&'static HeuristicSpec> {
    HEURISTICS.iter().find(|h| h.id == id)
}

/// Note used when every heuristic of a dimension passes.
#[must_use]
pub fn all_pass_note(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Homepage => "Strong homepage performance across all areas",
        Dimension::Pdp => "Excellent PDP with comprehensive product info",
        Dimension::Checkout => "Streamlined checkout with clear pricing",
        Dimension::ContentCommunity => "Strong content strategy with community focus",
        Dimension::MobileUx => "Excellent mobile experience",
        Dimension::PricePresentation => "Clear and effective price presentation",
    }
}

/// Remediation text for a priority fix on `dimension`.
#[must_use]
pub fn fix_recommendation(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Homepage => "Redesign hero section and improve new product surfacing",
        Dimension::Pdp => "Add more product images, reviews, and detailed specifications",
        Dimension::Checkout => "Implement express payment options and simplify checkout flow",
        Dimension::ContentCommunity => {
            "Integrate user-generated content and showcase collaborations"
        }
        Dimension::MobileUx => "Optimize mobile responsiveness and touch interactions",
        Dimension::PricePresentation => "Clarify pricing strategy and improve promotion visibility",
    }
}
