//! Caseflow Stream - Streaming classification consumer
//!
//! Consumes the typed event channel of a remote streaming classification
//! call:
//! - Classification phase machine (strictly forward, cancel resets)
//! - In-order chunk accumulation into the raw response buffer
//! - Structured-or-fallback result finalization
//! - Cooperative cancellation distinguished from failure
//!
//! # Example
//!
//! ```rust
//! use caseflow_stream::{ClassificationPhase, StreamingClassificationConsumer};
//!
//! let consumer = StreamingClassificationConsumer::new();
//! assert_eq!(consumer.phase(), ClassificationPhase::Starting);
//! assert!(!consumer.is_active());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod consumer;
pub mod error;
pub mod phase;

// Re-exports for convenience
pub use consumer::{ClassificationOutcome, StreamingClassificationConsumer};
pub use error::PhaseError;
pub use phase::{allowed_transitions, validate_transition, ClassificationPhase};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
