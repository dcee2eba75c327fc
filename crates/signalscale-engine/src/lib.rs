//! Run orchestration: validate, route, collect, analyze, assemble, check.

pub mod assemble;
pub mod coordinator;
pub mod error;
pub mod router;
pub mod validate;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use signalscale_analyze::{AnalysisContext, InfluenceScorer};
use signalscale_collect::{default_collectors, CollectError, Collector};
use signalscale_core::{
    AnalysisRequest, AnalysisResult, EngineConfig, SourceQuery, ValidatedRequest, Warning,
};
use uuid::Uuid;

pub use error::{InvariantError, RunError};
pub use router::Sections;

use crate::assemble::Assembler;
use crate::coordinator::collect_all;
use crate::router::plan;

/// Entry point for analysis runs. Holds no per-run state.
pub struct Engine {
    config: EngineConfig,
    collectors: Vec<Arc<dyn Collector>>,
    influence: InfluenceScorer,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field(
                "collectors",
                &self.collectors.iter().map(|c| c.source()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine backed by the HTTP collectors described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] if an HTTP client cannot be built.
    pub fn from_config(config: EngineConfig) -> Result<Self, CollectError> {
        let collectors = default_collectors(&config)?;
        Ok(Self::with_collectors(config, collectors))
    }

    #[must_use]
    pub fn with_collectors(config: EngineConfig, collectors: Vec<Arc<dyn Collector>>) -> Self {
        Self {
            config,
            collectors,
            influence: InfluenceScorer::default(),
        }
    }

    /// Swap the creator scoring model.
    #[must_use]
    pub fn with_influence_scorer(mut self, influence: InfluenceScorer) -> Self {
        self.influence = influence;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `request` and run it as of now.
    ///
    /// # Errors
    ///
    /// - [`RunError::Validation`] before any collection starts.
    /// - [`RunError::Invariant`] if the assembled result breaks an output
    ///   invariant.
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisResult, RunError> {
        let request = request.validate()?;
        self.run_validated(&request, Utc::now()).await
    }

    /// Run an already validated request with windows ending at `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Invariant`] if the assembled result breaks an
    /// output invariant.
    pub async fn run_validated(
        &self,
        request: &ValidatedRequest,
        as_of: DateTime<Utc>,
    ) -> Result<AnalysisResult, RunError> {
        let run_id = Uuid::new_v4();
        let deadline = tokio::time::Instant::now() + self.config.run_deadline;
        let sections = Sections::for_mode(request.mode);
        tracing::info!(
            run_id = %run_id,
            brand = %request.brand.name,
            mode = %request.mode,
            competitors = request.competitors.len(),
            "analysis run started"
        );

        let mut missing: Vec<Warning> = Vec::new();
        let mut work: Vec<(Arc<dyn Collector>, SourceQuery)> = Vec::new();
        for route in plan(request) {
            let mut matched = false;
            for collector in self.collectors.iter().filter(|c| c.source() == route.source) {
                let mut query = SourceQuery::new(run_id, route.source, request, as_of);
                query.terms.clone_from(&route.terms);
                work.push((Arc::clone(collector), query));
                matched = true;
            }
            if !matched {
                missing.push(Warning::new(route.source.as_str(), "no collector registered"));
            }
        }

        let collected = collect_all(work, deadline).await;

        let ctx = AnalysisContext::from_request(request, as_of);
        let assembled = Assembler {
            ctx: &ctx,
            records: &collected.records,
            provenance: &collected.provenance,
            cap: request.max_results_per_section,
            influence: &self.influence,
        }
        .assemble(sections);

        let mut warnings = collected.warnings;
        warnings.extend(missing);
        for w in &warnings {
            tracing::warn!(run_id = %run_id, source = %w.source, message = %w.message, "source warning");
        }

        let result = AnalysisResult {
            weekly_report: assembled.weekly_report,
            cultural_radar: assembled.cultural_radar,
            peer_tracker: assembled.peer_tracker,
            warnings,
            provenance: collected.provenance,
        };

        if let Err(e) = validate::validate(&result, sections, validate::Limits::from_request(request)) {
            tracing::error!(run_id = %run_id, error = %e, "result failed invariant check");
            return Err(e.into());
        }

        tracing::info!(
            run_id = %run_id,
            records = collected.records.len(),
            warnings = result.warnings.len(),
            sources = result.provenance.sources.len(),
            "analysis run finished"
        );
        Ok(result)
    }
}
