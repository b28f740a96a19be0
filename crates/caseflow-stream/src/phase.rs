//! Classification phase machine

use crate::error::PhaseError;
use serde::{Deserialize, Serialize};

/// Progress of one streaming classification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPhase {
    /// No stream open, or reset after a deliberate cancellation
    Starting,
    /// Prompt assembled, model named
    PromptReady,
    /// Tokens streaming
    LlmStreaming,
    /// Server-side structuring in progress
    Processing,
    /// Terminal: result finalized
    Complete,
    /// Terminal: stream failed
    Error,
}

impl ClassificationPhase {
    /// Terminal phases accept no further events
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClassificationPhase::Complete | ClassificationPhase::Error)
    }
}

/// Phases reachable from `from`
///
/// Strictly forward-moving, except that a deliberate cancellation resets
/// any non-terminal in-flight phase back to `Starting`.
pub fn allowed_transitions(from: ClassificationPhase) -> Vec<ClassificationPhase> {
    use ClassificationPhase::*;
    match from {
        Starting => vec![PromptReady, LlmStreaming, Error],
        PromptReady => vec![LlmStreaming, Error, Starting],
        LlmStreaming => vec![Processing, Error, Starting],
        Processing => vec![Complete, Error, Starting],
        Complete => vec![],
        Error => vec![],
    }
}

/// Validate a phase transition
pub fn validate_transition(
    from: ClassificationPhase,
    to: ClassificationPhase,
) -> Result<(), PhaseError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PhaseError::IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClassificationPhase::*;

    #[test]
    fn forward_transitions() {
        assert!(validate_transition(Starting, PromptReady).is_ok());
        assert!(validate_transition(PromptReady, LlmStreaming).is_ok());
        assert!(validate_transition(LlmStreaming, Processing).is_ok());
        assert!(validate_transition(Processing, Complete).is_ok());
    }

    #[test]
    fn cancellation_resets_to_starting() {
        assert!(validate_transition(LlmStreaming, Starting).is_ok());
        assert!(validate_transition(Processing, Starting).is_ok());
    }

    #[test]
    fn no_backward_skips() {
        assert!(validate_transition(Starting, Complete).is_err());
        assert!(validate_transition(Complete, Starting).is_err());
        assert!(validate_transition(Error, LlmStreaming).is_err());
    }

    #[test]
    fn terminal_phases() {
        assert!(Complete.is_terminal());
        assert!(Error.is_terminal());
        assert!(!LlmStreaming.is_terminal());
        assert!(allowed_transitions(Complete).is_empty());
        assert!(allowed_transitions(Error).is_empty());
    }
}
