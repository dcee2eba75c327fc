use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised before any collection work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown mode \"{0}\" (expected weekly_report, cultural_radar, peer_tracker or all)")]
    UnknownMode(String),

    #[error("brand name must not be empty")]
    EmptyBrandName,

    #[error("competitor at position {0} has an empty name")]
    EmptyCompetitorName(usize),

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}
