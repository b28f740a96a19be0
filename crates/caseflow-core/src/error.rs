//! Workflow error taxonomy
//!
//! Collaborator-level failures are translated into these variants at the
//! owning component's boundary; the controller never leaks raw transport
//! errors. Every failure leaves the workflow at a phase from which the
//! same stage can be retried, except validation failures, which require
//! corrected input and change no state at all.

use crate::phase::WorkflowPhase;

/// Main workflow error type
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Bad input; no state change; recoverable by correcting input
    #[error("invalid input: {0}")]
    Validation(String),

    /// Every search method failed
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// The network risk fan-out failed; no partial results were stored
    #[error("network analysis failed: {0}")]
    NetworkAnalysisFailed(String),

    /// The classification stream failed
    #[error("classification stream failed: {0}")]
    Streaming(String),

    /// A required workflow field is missing for case building
    #[error("incomplete workflow: missing {field}")]
    IncompleteWorkflow {
        /// Name of the first missing required field
        field: &'static str,
    },

    /// The investigation service rejected or failed the request
    #[error("investigation build failed: {0}")]
    InvestigationFailed(String),

    /// Operation not valid in the current phase
    #[error("operation {operation} not valid in phase {phase:?}")]
    InvalidPhase {
        /// Phase the workflow was in
        phase: WorkflowPhase,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// A classification attempt is already in flight (single-flight guard)
    #[error("classification already in flight")]
    ClassificationInFlight,

    /// Deliberately cancelled; not a failure
    #[error("operation cancelled")]
    Cancelled,
}

impl WorkflowError {
    /// Retryable errors allow re-invoking the same stage operation
    /// without re-entering earlier stages.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SearchUnavailable(_)
                | Self::NetworkAnalysisFailed(_)
                | Self::Streaming(_)
                | Self::InvestigationFailed(_)
        )
    }

    /// Validation failures changed no state and need corrected input
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Cancellation is explicit suppression of the error path
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WorkflowError::IncompleteWorkflow {
            field: "classification",
        };
        assert!(err.to_string().contains("classification"));
    }

    #[test]
    fn retryable_classification() {
        assert!(WorkflowError::SearchUnavailable("down".to_string()).is_retryable());
        assert!(WorkflowError::Streaming("cut".to_string()).is_retryable());
        assert!(!WorkflowError::Validation("empty name".to_string()).is_retryable());
        assert!(!WorkflowError::Cancelled.is_retryable());
    }

    #[test]
    fn cancelled_is_not_a_failure_class() {
        let err = WorkflowError::Cancelled;
        assert!(err.is_cancelled());
        assert!(!err.is_validation());
    }
}
