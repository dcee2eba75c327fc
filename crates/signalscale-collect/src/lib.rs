pub mod client;
pub mod collector;
pub mod ecommerce;
pub mod error;
pub mod rate_limit;
pub mod rss;
pub mod search;
pub mod social;
pub mod text;
pub mod trend;
pub mod website;

use std::sync::Arc;

use signalscale_core::EngineConfig;

pub use client::HttpClient;
pub use collector::{CollectOutcome, Collector};
pub use ecommerce::EcommerceCollector;
pub use error::CollectError;
pub use rate_limit::{RequestSpacer, RetryPolicy};
pub use social::SocialCollector;
pub use trend::TrendCollector;
pub use website::WebsiteCollector;

/// The four HTTP-backed collectors, in source priority order.
///
/// # Errors
///
/// Returns [`CollectError::Http`] if an HTTP client cannot be built.
pub fn default_collectors(config: &EngineConfig) -> Result<Vec<Arc<dyn Collector>>, CollectError> {
    let collectors: Vec<Arc<dyn Collector>> = vec![
        Arc::new(SocialCollector::new(config)?),
        Arc::new(EcommerceCollector::new(config)?),
        Arc::new(WebsiteCollector::new(config)?),
        Arc::new(TrendCollector::new(config)?),
    ];
    Ok(collectors)
}
