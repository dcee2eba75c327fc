pub mod config;
pub mod error;
pub mod heuristics;
pub mod query;
pub mod record;
pub mod request;
pub mod result;

pub use config::{load_engine_config, load_engine_config_from_env, EngineConfig};
pub use error::{ConfigError, ValidationError};
pub use query::{QueryTerm, SourceQuery};
pub use record::{Intent, Provenance, RawRecord, RecordMetrics, SourceKind, Warning};
pub use request::{
    AnalysisRequest, Brand, BrandMeta, Competitor, Mode, PriceBand, ValidatedRequest,
    MAX_WINDOW_DAYS,
};
pub use result::{
    Activation, AnalysisResult, ContentFocus, CreatorCandidate, CulturalRadar, CustomerSentiment,
    Dimension, DimensionComparison, EngagementHighlight, Impact, InsightKind, MentionInsight,
    MentionsOverview, Momentum, PeerScoreEntry, PeerTracker, PriorityFix, Recommendation,
    Scorecard, SentimentCounts, TrendSignal, WeeklyReport,
};
