//! Collaborator-level errors
//!
//! Transport and remote failures raised by service implementations.
//! Owning components translate these into the workflow error taxonomy
//! at their boundary; raw service errors never reach the controller.

/// Errors raised by collaborator services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transport-level failure (connection, protocol)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote service reported an error
    #[error("remote error: {0}")]
    Remote(String),

    /// The call exceeded its deadline
    #[error("service call timed out after {secs}s")]
    Timeout {
        /// Deadline that was exceeded
        secs: u64,
    },
}

impl ServiceError {
    /// Transient failures are worth retrying at the stage level
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}
