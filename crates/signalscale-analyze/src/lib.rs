//! Deterministic scoring over collected records. Nothing here performs I/O.

pub mod context;
pub mod engagement;
pub mod influence;
pub mod insight;
pub mod peer;
pub mod sentiment;
pub mod text;
pub mod trend;

use signalscale_core::RawRecord;

pub use context::AnalysisContext;
pub use engagement::{mentions_overview, EngagementAnalyzer, EngagementSummary};
pub use influence::{
    influence_score, top_activations, CreatorProfile, InfluenceScorer, KeywordOverlap,
    RelevanceModel,
};
pub use insight::{InsightAnalyzer, Insights};
pub use peer::PeerScorer;
pub use sentiment::SentimentAnalyzer;
pub use trend::TrendAnalyzer;

/// A pure function from records to one output section.
///
/// The same records and context always produce the same output.
pub trait Analyzer {
    type Output;

    fn analyze(&self, records: &[RawRecord], ctx: &AnalysisContext) -> Self::Output;
}
