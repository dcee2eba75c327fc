use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use signalscale_core::EngineConfig;
use tokio::time::Instant;

use crate::error::CollectError;
use crate::rate_limit::{retry_with_backoff, RequestSpacer, RetryPolicy};

/// Shared HTTP plumbing for every collector.
///
/// Every request waits for its host's spacing slot, is bounded by the
/// caller's absolute deadline, and is retried on transient failures.
pub struct HttpClient {
    client: Client,
    spacer: RequestSpacer,
    retry: RetryPolicy,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("spacer", &self.spacer)
            .field("retry", &self.retry)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Builds a client with the configured `User-Agent`, per-request timeout,
    /// spacing and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &EngineConfig) -> Result<Self, CollectError> {
        let client = Client::builder()
            .timeout(config.source_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            spacer: RequestSpacer::new(config.min_request_spacing),
            retry: RetryPolicy {
                max_retries: config.http_max_retries,
                backoff_base_ms: config.http_backoff_base_ms,
            },
            bearer_token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    #[must_use]
    pub fn min_spacing(&self) -> std::time::Duration {
        self.spacer.min_spacing()
    }

    /// GET `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// - [`CollectError::DeadlineExceeded`] when `deadline` passes first.
    /// - [`CollectError::RateLimited`] or [`CollectError::UnexpectedStatus`]
    ///   for non-2xx responses once retries are exhausted.
    /// - [`CollectError::Http`] for network failures.
    /// - [`CollectError::InvalidUrl`] when `url` has no host.
    pub async fn get_text(&self, url: &str, deadline: Instant) -> Result<String, CollectError> {
        let host = host_of(url)?;
        retry_with_backoff(self.retry, deadline, || {
            let host = host.clone();
            async move {
                self.spacer.wait(&host, deadline).await?;

                let mut request = self.client.get(url);
                if let Some(token) = &self.bearer_token {
                    request = request.bearer_auth(token);
                }
                let response = tokio::time::timeout_at(deadline, request.send())
                    .await
                    .map_err(|_| CollectError::DeadlineExceeded)??;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(CollectError::RateLimited {
                        host,
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(CollectError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                let body = tokio::time::timeout_at(deadline, response.text())
                    .await
                    .map_err(|_| CollectError::DeadlineExceeded)??;
                Ok(body)
            }
        })
        .await
    }

    /// GET `url` and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Everything [`Self::get_text`] returns, plus
    /// [`CollectError::Deserialize`] when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        deadline: Instant,
        context: &str,
    ) -> Result<T, CollectError> {
        let body = self.get_text(url, deadline).await?;
        serde_json::from_str(&body).map_err(|e| CollectError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Lowercased host of `url`.
///
/// # Errors
///
/// Returns [`CollectError::InvalidUrl`] when `url` does not parse or has no host.
pub fn host_of(url: &str) -> Result<String, CollectError> {
    let parsed = Url::parse(url).map_err(|e| CollectError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| CollectError::InvalidUrl {
            url: url.to_owned(),
            reason: "missing host".to_owned(),
        })
}

/// Resolve `href` against `base`, keeping only http(s) results.
pub(crate) fn resolve(base: &str, href: &str) -> Option<String> {
    let joined = Url::parse(base).ok()?.join(href).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

/// Normalise a configured site URL: add `https://` when the scheme is missing.
pub(crate) fn normalize_site_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_lowercases_and_strips_port_and_path() {
        assert_eq!(
            host_of("https://Shop.Example.com:8443/products/x").unwrap(),
            "shop.example.com"
        );
    }

    #[test]
    fn host_of_rejects_garbage() {
        assert!(matches!(
            host_of("not a url"),
            Err(CollectError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn resolve_handles_relative_and_absolute_links() {
        assert_eq!(
            resolve("https://acme.example", "/products/tee").as_deref(),
            Some("https://acme.example/products/tee")
        );
        assert_eq!(
            resolve("https://acme.example/", "https://cdn.example/products/a").as_deref(),
            Some("https://cdn.example/products/a")
        );
        assert!(resolve("https://acme.example", "mailto:hi@acme.example").is_none());
    }

    #[test]
    fn normalize_site_url_adds_scheme() {
        assert_eq!(normalize_site_url("acme.example/"), "https://acme.example");
        assert_eq!(
            normalize_site_url("http://acme.example"),
            "http://acme.example"
        );
    }
}
