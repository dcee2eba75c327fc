use std::time::Duration;

use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "signalscale/0.1 (competitive-intelligence)";
const DEFAULT_RESOLVER_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Run-wide engine settings, read once at process start and never mutated.
#[derive(Clone)]
pub struct EngineConfig {
    pub log_level: String,
    /// Absolute budget for one orchestration run, fixed when the run starts.
    pub run_deadline: Duration,
    /// Upper bound for a single collector; the coordinator hands out
    /// `min(source_timeout, time remaining)`.
    pub source_timeout: Duration,
    /// Minimum gap between two requests to the same host from one collector.
    pub min_request_spacing: Duration,
    pub http_max_retries: u32,
    pub http_backoff_base_ms: u64,
    pub user_agent: String,
    /// JSON search endpoint shared by the social and e-commerce collectors.
    pub search_api_url: Option<String>,
    pub search_api_key: Option<String>,
    /// RSS feeds polled by the trend collector.
    pub trend_feeds: Vec<String>,
    /// How many brand sites the website collector audits at once.
    pub site_concurrency: usize,
    /// MediaWiki API used to find official sites for brands given without a
    /// URL. `None` disables the lookup.
    pub resolver_api_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            run_deadline: Duration::from_secs(110),
            source_timeout: Duration::from_secs(45),
            min_request_spacing: Duration::from_millis(250),
            http_max_retries: 2,
            http_backoff_base_ms: 500,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_api_url: None,
            search_api_key: None,
            trend_feeds: Vec::new(),
            site_concurrency: 4,
            resolver_api_url: Some(DEFAULT_RESOLVER_API_URL.to_string()),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("log_level", &self.log_level)
            .field("run_deadline", &self.run_deadline)
            .field("source_timeout", &self.source_timeout)
            .field("min_request_spacing", &self.min_request_spacing)
            .field("http_max_retries", &self.http_max_retries)
            .field("http_backoff_base_ms", &self.http_backoff_base_ms)
            .field("user_agent", &self.user_agent)
            .field("search_api_url", &self.search_api_url)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("trend_feeds", &self.trend_feeds)
            .field("site_concurrency", &self.site_concurrency)
            .field("resolver_api_url", &self.resolver_api_url)
            .finish()
    }
}

/// Load engine configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_engine_config_from_env()
}

/// Load engine configuration from environment variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config_from_env() -> Result<EngineConfig, ConfigError> {
    build_engine_config(|key| std::env::var(key))
}

/// Build engine configuration using the provided env-var lookup function.
///
/// Kept separate from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_engine_config<F>(lookup: F) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SIGNALSCALE_LOG_LEVEL", "info");
    let run_deadline_secs = parse_positive_u64("SIGNALSCALE_RUN_DEADLINE_SECS", "110")?;
    let source_timeout_secs = parse_positive_u64("SIGNALSCALE_SOURCE_TIMEOUT_SECS", "45")?;
    let min_request_spacing_ms = parse_u64("SIGNALSCALE_MIN_REQUEST_SPACING_MS", "250")?;
    let http_max_retries = parse_u32("SIGNALSCALE_HTTP_MAX_RETRIES", "2")?;
    let http_backoff_base_ms = parse_u64("SIGNALSCALE_HTTP_BACKOFF_BASE_MS", "500")?;
    let user_agent = or_default("SIGNALSCALE_USER_AGENT", DEFAULT_USER_AGENT);
    let search_api_url = optional("SIGNALSCALE_SEARCH_API_URL");
    let search_api_key = optional("SIGNALSCALE_SEARCH_API_KEY");
    let trend_feeds = optional("SIGNALSCALE_TREND_FEEDS")
        .map(|raw| parse_list(&raw))
        .unwrap_or_default();
    let site_concurrency = usize::try_from(parse_positive_u64("SIGNALSCALE_SITE_CONCURRENCY", "4")?)
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SIGNALSCALE_SITE_CONCURRENCY".to_string(),
            reason: e.to_string(),
        })?;
    let resolver_api_url = match optional("SIGNALSCALE_RESOLVER_API_URL") {
        Some(v) if v.eq_ignore_ascii_case("off") => None,
        Some(v) => Some(v),
        None => Some(DEFAULT_RESOLVER_API_URL.to_string()),
    };

    Ok(EngineConfig {
        log_level,
        run_deadline: Duration::from_secs(run_deadline_secs),
        source_timeout: Duration::from_secs(source_timeout_secs),
        min_request_spacing: Duration::from_millis(min_request_spacing_ms),
        http_max_retries,
        http_backoff_base_ms,
        user_agent,
        search_api_url,
        search_api_key,
        trend_feeds,
        site_concurrency,
        resolver_api_url,
    })
}

/// Split a comma-separated env value, dropping blanks and duplicates.
fn parse_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.run_deadline, Duration::from_secs(110));
        assert_eq!(cfg.source_timeout, Duration::from_secs(45));
        assert_eq!(cfg.min_request_spacing, Duration::from_millis(250));
        assert_eq!(cfg.http_max_retries, 2);
        assert_eq!(cfg.http_backoff_base_ms, 500);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert!(cfg.search_api_url.is_none());
        assert!(cfg.search_api_key.is_none());
        assert!(cfg.trend_feeds.is_empty());
        assert_eq!(cfg.site_concurrency, 4);
        assert_eq!(cfg.resolver_api_url.as_deref(), Some(DEFAULT_RESOLVER_API_URL));
    }

    #[test]
    fn defaults_match_default_impl() {
        let map: HashMap<&str, &str> = HashMap::new();
        let built = build_engine_config(lookup_from_map(&map)).unwrap();
        let default = EngineConfig::default();
        assert_eq!(format!("{built:?}"), format!("{default:?}"));
    }

    #[test]
    fn run_deadline_override() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_RUN_DEADLINE_SECS", "95");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.run_deadline, Duration::from_secs(95));
    }

    #[test]
    fn run_deadline_invalid() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_RUN_DEADLINE_SECS", "soon");
        let result = build_engine_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SIGNALSCALE_RUN_DEADLINE_SECS"),
            "expected InvalidEnvVar(SIGNALSCALE_RUN_DEADLINE_SECS), got: {result:?}"
        );
    }

    #[test]
    fn zero_source_timeout_rejected() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_SOURCE_TIMEOUT_SECS", "0");
        let result = build_engine_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SIGNALSCALE_SOURCE_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SIGNALSCALE_SOURCE_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn spacing_may_be_zero() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_MIN_REQUEST_SPACING_MS", "0");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.min_request_spacing, Duration::ZERO);
    }

    #[test]
    fn max_retries_invalid() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_HTTP_MAX_RETRIES", "-1");
        let result = build_engine_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SIGNALSCALE_HTTP_MAX_RETRIES"),
            "expected InvalidEnvVar(SIGNALSCALE_HTTP_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn blank_search_url_treated_as_unset() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_SEARCH_API_URL", "   ");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.search_api_url.is_none());
    }

    #[test]
    fn trend_feeds_split_and_deduplicated() {
        let mut map = HashMap::new();
        map.insert(
            "SIGNALSCALE_TREND_FEEDS",
            "https://a.example/rss, https://b.example/rss,,https://a.example/rss",
        );
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.trend_feeds,
            vec![
                "https://a.example/rss".to_string(),
                "https://b.example/rss".to_string()
            ]
        );
    }

    #[test]
    fn debug_redacts_search_api_key() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_SEARCH_API_KEY", "super-secret");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn resolver_can_be_switched_off_or_redirected() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_RESOLVER_API_URL", "OFF");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.resolver_api_url.is_none());

        map.insert("SIGNALSCALE_RESOLVER_API_URL", "http://localhost:9000/w/api.php");
        let cfg = build_engine_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.resolver_api_url.as_deref(),
            Some("http://localhost:9000/w/api.php")
        );
    }

    #[test]
    fn zero_site_concurrency_rejected() {
        let mut map = HashMap::new();
        map.insert("SIGNALSCALE_SITE_CONCURRENCY", "0");
        let result = build_engine_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }
}
