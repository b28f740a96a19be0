//! Workflow phase machine

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};

/// Stages of one investigation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Awaiting entity input
    #[default]
    Input,
    /// Searching the configured retrieval methods
    ParallelSearch,
    /// Network risk analysis complete
    NetworkAnalysis,
    /// Classification in flight or complete
    Classification,
    /// Terminal: case investigation built
    Investigation,
}

/// Marker for the single outstanding collaborator call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStage {
    /// Parallel search in flight
    Search,
    /// Network risk fan-out in flight
    NetworkAnalysis,
    /// Classification stream open
    Classification,
    /// Investigation build in flight
    Investigation,
}

/// Phases reachable from `from`
///
/// Monotonically forward, with two exceptions: reset returns to `Input`
/// from every phase, and a cancelled classification falls back to
/// `NetworkAnalysis`.
pub fn allowed_transitions(from: WorkflowPhase) -> Vec<WorkflowPhase> {
    use WorkflowPhase::*;
    match from {
        Input => vec![ParallelSearch],
        ParallelSearch => vec![NetworkAnalysis, Input],
        NetworkAnalysis => vec![Classification, Input],
        Classification => vec![Investigation, NetworkAnalysis, Input],
        Investigation => vec![Input],
    }
}

/// Validate a phase transition
pub fn validate_transition(from: WorkflowPhase, to: WorkflowPhase) -> Result<(), WorkflowError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidPhase {
            phase: from,
            operation: "transition",
        })
    }
}
