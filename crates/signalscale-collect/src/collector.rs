use std::time::Duration;

use async_trait::async_trait;
use signalscale_core::{RawRecord, SourceKind, SourceQuery, Warning};

use crate::error::CollectError;

/// What one collector hands back to the coordinator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectOutcome {
    pub records: Vec<RawRecord>,
    /// Pages or feeds read while collecting, beyond the record URLs.
    pub sources: Vec<String>,
    pub warning: Option<Warning>,
}

impl CollectOutcome {
    #[must_use]
    pub fn with_warning(source: SourceKind, message: impl Into<String>) -> Self {
        Self {
            warning: Some(Warning::new(source.as_str(), message)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn not_configured(source: SourceKind) -> Self {
        Self::with_warning(source, "not configured")
    }
}

/// A pluggable external data source.
///
/// `fetch` never fails hard: problems come back as a [`Warning`] next to
/// whatever records were gathered before the problem. Implementations must
/// stop issuing requests once `budget` has elapsed and report
/// `"<source> timed out"` in that case.
#[async_trait]
pub trait Collector: Send + Sync {
    fn source(&self) -> SourceKind;

    /// Upper bound on this collector's share of a run.
    fn timeout(&self) -> Duration;

    /// Minimum gap between two requests to the same host.
    fn min_spacing(&self) -> Duration;

    async fn fetch(&self, query: &SourceQuery, budget: Duration) -> CollectOutcome;
}

/// Running tally of request failures within a single `fetch`.
#[derive(Debug)]
pub(crate) struct Tally {
    source: SourceKind,
    attempted: usize,
    failed: usize,
    first_error: Option<String>,
    timed_out: bool,
}

impl Tally {
    pub(crate) fn new(source: SourceKind) -> Self {
        Self {
            source,
            attempted: 0,
            failed: 0,
            first_error: None,
            timed_out: false,
        }
    }

    pub(crate) fn attempt(&mut self) {
        self.attempted += 1;
    }

    pub(crate) fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub(crate) fn mark_timed_out(&mut self) {
        self.timed_out = true;
    }

    /// Record a failure. Deadline failures flip the tally into timed-out state.
    pub(crate) fn fail(&mut self, target: &str, err: &CollectError) {
        if err.is_deadline() {
            self.timed_out = true;
            return;
        }
        self.failed += 1;
        tracing::warn!(source = %self.source, target, error = %err, "collector request failed");
        if self.first_error.is_none() {
            self.first_error = Some(err.to_string());
        }
    }

    /// At most one warning: a timeout wins over individual request failures.
    pub(crate) fn into_warning(self) -> Option<Warning> {
        if self.timed_out {
            return Some(Warning::timed_out(self.source.as_str()));
        }
        let first_error = self.first_error?;
        Some(Warning::new(
            self.source.as_str(),
            format!(
                "{} of {} requests failed: {first_error}",
                self.failed, self.attempted
            ),
        ))
    }
}

/// Drop records whose `(url, intent)` pair was already seen, keeping order.
pub(crate) fn dedup_records(records: &mut Vec<RawRecord>) {
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert((r.url.clone(), r.intent)));
}
