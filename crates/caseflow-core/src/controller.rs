//! Workflow controller
//!
//! Single mutable owner of one investigation run. Drives the stages in
//! order, guards every operation on the active phase, and folds stage
//! results back into the state. Only the classification stage is
//! long-running; it is split into `start_classification` (opens the
//! stream, returns an abort handle) and `run_classification` (drives the
//! stream to its terminal outcome) so callers can cancel mid-stream.

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::fanout::NetworkRiskFanOut;
use crate::investigation::CaseInvestigationBuilder;
use crate::phase::{PendingStage, WorkflowPhase};
use crate::search::ParallelSearchCoordinator;
use crate::state::{RunId, WorkflowState};
use caseflow_services::{
    AbortReason, CaseInvestigation, ClassificationService, EntityInput, InvestigationService,
    NetworkService, SearchService, StreamAbortHandle,
};
use caseflow_stream::{ClassificationOutcome, StreamingClassificationConsumer};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Orchestrates one entity investigation end to end
pub struct WorkflowController {
    run_id: RunId,
    config: WorkflowConfig,
    state: WorkflowState,
    coordinator: ParallelSearchCoordinator,
    fanout: NetworkRiskFanOut,
    builder: CaseInvestigationBuilder,
    classification_service: Arc<dyn ClassificationService>,
    consumer: StreamingClassificationConsumer,
}

impl WorkflowController {
    /// Create a controller over the four collaborator services
    #[must_use]
    pub fn new(
        config: WorkflowConfig,
        search: Arc<dyn SearchService>,
        network: Arc<dyn NetworkService>,
        classification: Arc<dyn ClassificationService>,
        investigation: Arc<dyn InvestigationService>,
    ) -> Self {
        Self {
            run_id: RunId::new(),
            config,
            state: WorkflowState::new(),
            coordinator: ParallelSearchCoordinator::new(search),
            fanout: NetworkRiskFanOut::new(network),
            builder: CaseInvestigationBuilder::new(investigation),
            classification_service: classification,
            consumer: StreamingClassificationConsumer::new(),
        }
    }

    /// Identifier of this run
    #[inline]
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Current workflow state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Streaming consumer, for phase and progress inspection
    #[inline]
    #[must_use]
    pub fn consumer(&self) -> &StreamingClassificationConsumer {
        &self.consumer
    }

    /// Validate entity input, accept it, and run the parallel search
    ///
    /// Invalid input is rejected without any state change, so the caller
    /// can correct and resubmit.
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] outside the `Input` phase
    /// - [`WorkflowError::Validation`] for empty names or attribute sets
    /// - [`WorkflowError::SearchUnavailable`] when every method fails
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn submit_entity(&mut self, input: EntityInput) -> Result<(), WorkflowError> {
        self.require_phase(WorkflowPhase::Input, "submit_entity")?;
        if !input.is_valid() {
            return Err(WorkflowError::Validation(
                "entity input requires a name and at least one non-empty attribute".to_string(),
            ));
        }

        info!(name = %input.name, "entity submitted");
        self.state.accept_input(input);
        self.run_search().await
    }

    /// Re-run the parallel search with the stored entity input
    ///
    /// Only valid while search results have not been stored yet, i.e.
    /// after a failed search attempt.
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] outside `ParallelSearch` or once
    ///   results exist
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn retry_search(&mut self) -> Result<(), WorkflowError> {
        self.require_phase(WorkflowPhase::ParallelSearch, "retry_search")?;
        if self.state.search_results().is_some() {
            return Err(WorkflowError::InvalidPhase {
                phase: self.state.phase(),
                operation: "retry_search",
            });
        }
        self.run_search().await
    }

    async fn run_search(&mut self) -> Result<(), WorkflowError> {
        let input = self
            .state
            .entity_input()
            .cloned()
            .ok_or(WorkflowError::IncompleteWorkflow {
                field: "entity input",
            })?;

        self.state.begin(PendingStage::Search);
        match self
            .coordinator
            .search(&input, &self.config.search_methods)
            .await
        {
            Ok(result) => {
                info!(
                    failed_methods = result.failed_methods.len(),
                    "parallel search completed"
                );
                self.state.store_search(result);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "parallel search failed");
                self.state.fail_pending(err.to_string());
                Err(err)
            }
        }
    }

    /// Run the network risk fan-out over the top-ranked candidates
    ///
    /// Candidates are the merged ranking truncated to the configured
    /// count. An empty candidate set is rejected before any service call
    /// is made.
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] outside `ParallelSearch`
    /// - [`WorkflowError::Validation`] when no candidates were found
    /// - [`WorkflowError::NetworkAnalysisFailed`] when any fetch fails
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn run_network_analysis(&mut self) -> Result<(), WorkflowError> {
        self.require_phase(WorkflowPhase::ParallelSearch, "run_network_analysis")?;
        let search = self
            .state
            .search_results()
            .ok_or(WorkflowError::IncompleteWorkflow {
                field: "search results",
            })?;

        let candidates = search.top_candidates(self.config.top_candidates);
        if candidates.is_empty() {
            return Err(WorkflowError::Validation(
                "no candidate entities found to analyze".to_string(),
            ));
        }

        self.state.begin(PendingStage::NetworkAnalysis);
        match self.fanout.analyze(&candidates, &self.config).await {
            Ok(analysis) => {
                info!(
                    analyzed = analysis.summary.analyzed,
                    average_risk = analysis.summary.average_risk,
                    "network analysis completed"
                );
                self.state.store_network(analysis);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "network analysis failed");
                self.state.fail_pending(err.to_string());
                Err(err)
            }
        }
    }

    /// Open the classification stream
    ///
    /// The phase advances to `Classification` before the stream opens,
    /// so observers see the classification as underway immediately; an
    /// open failure records the error and leaves the phase there for a
    /// retry. Returns a handle that can abort the stream from other
    /// tasks.
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] before network analysis exists
    /// - [`WorkflowError::ClassificationInFlight`] while a stream is open
    /// - [`WorkflowError::Streaming`] when the service refuses the call
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn start_classification(&mut self) -> Result<StreamAbortHandle, WorkflowError> {
        if self.state.pending().is_some() || self.consumer.is_active() {
            return Err(WorkflowError::ClassificationInFlight);
        }
        let phase = self.state.phase();
        if phase != WorkflowPhase::NetworkAnalysis && phase != WorkflowPhase::Classification {
            return Err(WorkflowError::InvalidPhase {
                phase,
                operation: "start_classification",
            });
        }
        if self.state.network_analysis().is_none() {
            return Err(WorkflowError::IncompleteWorkflow {
                field: "network analysis",
            });
        }

        self.state.enter_classification();
        self.state.begin(PendingStage::Classification);

        let snapshot = self.state.snapshot();
        let options = self.config.classification.clone();
        if let Err(err) = self
            .consumer
            .start(self.classification_service.as_ref(), &snapshot, &options)
            .await
        {
            warn!(error = %err, "classification stream failed to open");
            self.state.fail_pending(err.to_string());
            return Err(WorkflowError::Streaming(err.to_string()));
        }

        info!("classification stream opened");
        self.consumer
            .abort_handle()
            .ok_or_else(|| WorkflowError::Streaming("stream closed before first event".to_string()))
    }

    /// Drive the open classification stream to its terminal outcome
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] when no stream is open
    /// - [`WorkflowError::Streaming`] when the stream ends in failure
    /// - [`WorkflowError::Cancelled`] when the stream was deliberately
    ///   aborted; the workflow rolls back to `NetworkAnalysis`
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn run_classification(&mut self) -> Result<(), WorkflowError> {
        if self.state.pending() != Some(PendingStage::Classification) || !self.consumer.is_active()
        {
            return Err(WorkflowError::InvalidPhase {
                phase: self.state.phase(),
                operation: "run_classification",
            });
        }

        match self.consumer.run().await {
            ClassificationOutcome::Complete(result) => {
                info!(
                    chunk_count = result.chunk_count,
                    unstructured = result.unstructured,
                    "classification completed"
                );
                self.state.store_classification(result);
                Ok(())
            }
            ClassificationOutcome::Failed {
                message,
                chunk_count,
                ..
            } => {
                warn!(%message, chunk_count, "classification stream failed");
                self.state.fail_pending(message.clone());
                Err(WorkflowError::Streaming(message))
            }
            ClassificationOutcome::Cancelled { reason } => {
                info!(?reason, "classification cancelled, rolling back");
                self.state.rollback_classification();
                Err(WorkflowError::Cancelled)
            }
        }
    }

    /// Cancel an in-flight classification and roll back
    ///
    /// Safe to call at any time; a no-op when no stream is open.
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub fn cancel_classification(&mut self) {
        if !self.consumer.is_active()
            && self.state.pending() != Some(PendingStage::Classification)
        {
            return;
        }
        self.consumer.cancel(AbortReason::UserRequested);
        self.state.rollback_classification();
    }

    /// Build the final case investigation from the accumulated state
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidPhase`] before a classification exists
    /// - [`WorkflowError::InvestigationFailed`] on service failure
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn build_investigation(&mut self) -> Result<CaseInvestigation, WorkflowError> {
        self.require_phase(WorkflowPhase::Classification, "build_investigation")?;
        if self.state.classification().is_none() {
            return Err(WorkflowError::IncompleteWorkflow {
                field: "classification",
            });
        }

        self.state.begin(PendingStage::Investigation);
        let snapshot = self.state.snapshot();
        match self.builder.build(&snapshot).await {
            Ok(case) => {
                self.state.store_investigation(case.clone());
                Ok(case)
            }
            Err(err) => {
                warn!(error = %err, "case investigation failed");
                self.state.fail_pending(err.to_string());
                Err(err)
            }
        }
    }

    /// Tear the run down and return to the `Input` phase
    ///
    /// Valid from any phase, including mid-stream; infallible.
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub fn reset(&mut self) {
        self.consumer.cancel(AbortReason::Teardown);
        self.consumer = StreamingClassificationConsumer::new();
        self.state.reset();
        info!("workflow reset");
    }

    fn require_phase(
        &self,
        expected: WorkflowPhase,
        operation: &'static str,
    ) -> Result<(), WorkflowError> {
        let phase = self.state.phase();
        if phase != expected {
            return Err(WorkflowError::InvalidPhase { phase, operation });
        }
        Ok(())
    }
}
