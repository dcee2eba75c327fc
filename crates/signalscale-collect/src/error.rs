use thiserror::Error;

/// Failures inside a collector. Never escapes a collector: every variant is
/// turned into a [`signalscale_core::Warning`] at the `fetch` boundary.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("rate limited by {host} (retry after {retry_after_secs}s)")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("collection deadline reached")]
    DeadlineExceeded,
}

impl CollectError {
    /// True when the failure is caused by the collector's own time budget.
    #[must_use]
    pub fn is_deadline(&self) -> bool {
        matches!(self, CollectError::DeadlineExceeded)
    }
}
