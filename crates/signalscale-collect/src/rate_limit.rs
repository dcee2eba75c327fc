//! Per-host request spacing and retry with exponential back-off.
//!
//! Both helpers take the collector's absolute deadline and never sleep past
//! it: a wait that would cross the deadline fails fast instead.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CollectError;

/// Enforces a minimum gap between two requests to the same host.
///
/// Slots are reserved under the lock, so concurrent callers targeting one
/// host queue up behind each other instead of firing together.
#[derive(Debug)]
pub struct RequestSpacer {
    min_spacing: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl RequestSpacer {
    #[must_use]
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Wait until a request to `host` is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::DeadlineExceeded`] when the next free slot for
    /// `host` lies beyond `deadline`. The slot is not consumed in that case.
    pub async fn wait(&self, host: &str, deadline: Instant) -> Result<(), CollectError> {
        let slot = {
            let mut slots = self
                .next_slot
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = Instant::now();
            let slot = slots.get(host).map_or(now, |&next| next.max(now));
            if slot >= deadline {
                return Err(CollectError::DeadlineExceeded);
            }
            slots.insert(host.to_string(), slot + self.min_spacing);
            slot
        };
        tokio::time::sleep_until(slot).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

/// Returns `true` for failures worth another attempt: HTTP 429, 5xx and
/// network-level errors (timeouts, refused or reset connections).
pub(crate) fn is_retriable(err: &CollectError) -> bool {
    match err {
        CollectError::RateLimited { .. } => true,
        CollectError::UnexpectedStatus { status, .. } => *status >= 500,
        CollectError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CollectError::Deserialize { .. }
        | CollectError::Xml(_)
        | CollectError::InvalidUrl { .. }
        | CollectError::DeadlineExceeded => false,
    }
}

/// Back-off before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at 30 s, with ±25 % jitter.
fn backoff_delay(backoff_base_ms: u64, attempt: u32) -> Duration {
    const MAX_DELAY_MS: u64 = 30_000;
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}

/// Runs `operation`, retrying transient errors up to `policy.max_retries`
/// extra times.
///
/// A retry whose back-off would end at or after `deadline` is not attempted;
/// the last error is returned instead.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    deadline: Instant,
    mut operation: F,
) -> Result<T, CollectError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(policy.backoff_base_ms, attempt);
                if Instant::now() + delay >= deadline {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient collector error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
