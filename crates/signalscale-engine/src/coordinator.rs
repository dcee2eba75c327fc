//! Concurrent collection under one run-wide deadline.

use std::sync::Arc;
use std::time::Duration;

use signalscale_collect::{CollectOutcome, Collector};
use signalscale_core::{Provenance, RawRecord, SourceKind, SourceQuery, Warning};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Largest slice of a sub-deadline held back so a collector can return its
/// partial records before the coordinator cuts it off.
const MAX_RESERVE: Duration = Duration::from_millis(250);

/// Everything the collectors produced, merged in source priority order.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<RawRecord>,
    pub warnings: Vec<Warning>,
    pub provenance: Provenance,
}

impl Collected {
    /// Records keep trimmed URLs so evidence matches provenance exactly.
    /// Records without a URL are dropped.
    fn merge(&mut self, outcome: CollectOutcome) {
        for url in &outcome.sources {
            self.provenance.record(url);
        }
        for mut record in outcome.records {
            record.url = record.url.trim().to_owned();
            if record.url.is_empty() {
                tracing::debug!(source = %record.source, platform = %record.platform, "record without url dropped");
                continue;
            }
            record.author_url = record
                .author_url
                .take()
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty());
            self.provenance.record(&record.url);
            self.records.push(record);
        }
        self.warnings.extend(outcome.warning);
    }
}

struct Running {
    source: SourceKind,
    cutoff: Instant,
    handle: JoinHandle<CollectOutcome>,
}

/// Budget handed to the collector and the hard cutoff the coordinator
/// enforces, for a collector starting at `now`.
fn split_budget(timeout: Duration, now: Instant, run_deadline: Instant) -> (Duration, Instant) {
    let sub = timeout.min(run_deadline.saturating_duration_since(now));
    let reserve = (sub / 10).min(MAX_RESERVE);
    (sub - reserve, now + sub)
}

/// Run every `(collector, query)` pair concurrently and merge the outcomes.
///
/// Each collector gets `min(its timeout, time left before run_deadline)`.
/// A task still running at its cutoff is aborted and contributes exactly one
/// `"<source> timed out"` warning. A task that panics contributes
/// `"<source> task failed"`. Merge order is source priority, never
/// completion order.
pub async fn collect_all(
    work: Vec<(Arc<dyn Collector>, SourceQuery)>,
    run_deadline: Instant,
) -> Collected {
    let mut running: Vec<Running> = work
        .into_iter()
        .map(|(collector, query)| {
            let source = collector.source();
            let (budget, cutoff) = split_budget(collector.timeout(), Instant::now(), run_deadline);
            tracing::debug!(
                run_id = %query.run_id,
                source = %source,
                budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                min_spacing_ms = u64::try_from(collector.min_spacing().as_millis()).unwrap_or(u64::MAX),
                "collector started"
            );
            let handle = tokio::spawn(async move { collector.fetch(&query, budget).await });
            Running {
                source,
                cutoff,
                handle,
            }
        })
        .collect();

    // Stable: two collectors of the same kind keep registration order.
    running.sort_by_key(|r| r.source);

    let mut collected = Collected::default();
    for Running {
        source,
        cutoff,
        mut handle,
    } in running
    {
        match tokio::time::timeout_at(cutoff, &mut handle).await {
            Ok(Ok(outcome)) => {
                tracing::debug!(
                    source = %source,
                    records = outcome.records.len(),
                    "collector finished"
                );
                collected.merge(outcome);
            }
            Ok(Err(e)) => {
                tracing::warn!(source = %source, error = %e, "collector task failed");
                collected
                    .warnings
                    .push(Warning::new(source.as_str(), format!("{source} task failed")));
            }
            Err(_) => {
                handle.abort();
                tracing::warn!(source = %source, "collector cut off at deadline");
                collected.warnings.push(Warning::timed_out(source.as_str()));
            }
        }
    }
    collected
}
