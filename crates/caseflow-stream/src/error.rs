//! Stream-level errors

use crate::phase::ClassificationPhase;

/// Errors raised by the classification phase machine
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    /// Transition not permitted by the phase machine
    #[error("illegal classification phase transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Phase the machine was in
        from: ClassificationPhase,
        /// Phase that was requested
        to: ClassificationPhase,
    },
}
