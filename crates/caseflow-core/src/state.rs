//! Workflow state
//!
//! Owned exclusively by the controller. Other components receive
//! read-only snapshots and return results; the controller decides how to
//! fold them in. Exactly one phase is active at a time and at most one
//! collaborator call is outstanding, tracked by the pending marker.

use crate::phase::{validate_transition, PendingStage, WorkflowPhase};
use caseflow_services::{
    CaseInvestigation, ClassificationResult, EntityInput, NetworkAnalysis, SearchResult,
    WorkflowSnapshot,
};
use ulid::Ulid;

/// Unique identifier for one workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate a new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one investigation run
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    phase: WorkflowPhase,
    pending: Option<PendingStage>,
    entity_input: Option<EntityInput>,
    search: Option<SearchResult>,
    network: Option<NetworkAnalysis>,
    classification: Option<ClassificationResult>,
    investigation: Option<CaseInvestigation>,
    error: Option<String>,
}

impl WorkflowState {
    /// Fresh state in the `Input` phase
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Outstanding collaborator call, if any
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<PendingStage> {
        self.pending
    }

    /// Submitted entity input
    #[inline]
    #[must_use]
    pub fn entity_input(&self) -> Option<&EntityInput> {
        self.entity_input.as_ref()
    }

    /// Stored search results
    #[inline]
    #[must_use]
    pub fn search_results(&self) -> Option<&SearchResult> {
        self.search.as_ref()
    }

    /// Stored network analysis
    #[inline]
    #[must_use]
    pub fn network_analysis(&self) -> Option<&NetworkAnalysis> {
        self.network.as_ref()
    }

    /// Stored classification result
    #[inline]
    #[must_use]
    pub fn classification(&self) -> Option<&ClassificationResult> {
        self.classification.as_ref()
    }

    /// Stored case investigation
    #[inline]
    #[must_use]
    pub fn investigation(&self) -> Option<&CaseInvestigation> {
        self.investigation.as_ref()
    }

    /// Error recorded by the last failed stage
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Read-only view for collaborators
    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            entity: self.entity_input.clone(),
            search: self.search.clone(),
            network: self.network.clone(),
            classification: self.classification.clone(),
        }
    }

    /// Accept entity input and enter the search phase
    pub(crate) fn accept_input(&mut self, input: EntityInput) {
        self.entity_input = Some(input);
        self.error = None;
        self.advance(WorkflowPhase::ParallelSearch);
    }

    /// Mark a collaborator call as outstanding
    pub(crate) fn begin(&mut self, stage: PendingStage) {
        debug_assert!(self.pending.is_none(), "a collaborator call is already pending");
        self.pending = Some(stage);
    }

    /// Record a stage failure; the phase is left where it was, retryable
    pub(crate) fn fail_pending(&mut self, message: String) {
        self.pending = None;
        self.error = Some(message);
    }

    /// Store search results; phase stays `ParallelSearch` until network
    /// analysis advances it
    pub(crate) fn store_search(&mut self, result: SearchResult) {
        self.search = Some(result);
        self.pending = None;
        self.error = None;
    }

    /// Store the network analysis and advance
    pub(crate) fn store_network(&mut self, analysis: NetworkAnalysis) {
        self.network = Some(analysis);
        self.pending = None;
        self.error = None;
        self.advance(WorkflowPhase::NetworkAnalysis);
    }

    /// Optimistically enter the classification phase before the stream
    /// resolves
    pub(crate) fn enter_classification(&mut self) {
        if self.phase() != WorkflowPhase::Classification {
            self.advance(WorkflowPhase::Classification);
        }
        self.error = None;
    }

    /// Store the finalized classification; phase stays `Classification`
    pub(crate) fn store_classification(&mut self, result: ClassificationResult) {
        self.classification = Some(result);
        self.pending = None;
        self.error = None;
    }

    /// Roll a cancelled classification back to the preceding phase,
    /// clearing any error: cancelled is not failed
    pub(crate) fn rollback_classification(&mut self) {
        self.pending = None;
        self.error = None;
        self.advance(WorkflowPhase::NetworkAnalysis);
    }

    /// Store the case investigation and reach the terminal phase
    pub(crate) fn store_investigation(&mut self, case: CaseInvestigation) {
        self.investigation = Some(case);
        self.pending = None;
        self.error = None;
        self.advance(WorkflowPhase::Investigation);
    }

    /// Discard everything and return to `Input`; always succeeds
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    fn advance(&mut self, to: WorkflowPhase) {
        debug_assert!(
            validate_transition(self.phase, to).is_ok(),
            "illegal workflow transition: {:?} -> {:?}",
            self.phase,
            to
        );
        self.phase = to;
    }
}
