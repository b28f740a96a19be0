//! Caseflow Services - Model types and collaborator contracts
//!
//! The foundational crate of the caseflow workspace:
//! - Entity, search, network, classification, and investigation types
//! - The typed, ordered stream event channel
//! - Async contracts for the four external collaborator services
//!
//! # Example
//!
//! ```rust
//! use caseflow_services::{EntityInput, SearchResult};
//!
//! let input = EntityInput::new("Samantha Miller").with_attribute("address", "456 Oak Ave");
//! assert!(input.is_valid());
//! assert!(SearchResult::default().is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod channel;
pub mod classify;
pub mod entity;
pub mod error;
pub mod investigation;
pub mod network;
pub mod search;
pub mod snapshot;
pub mod traits;

// Re-exports for convenience
pub use channel::{channel, AbortReason, StreamAbortHandle, StreamEventChannel, StreamEventSender};
pub use classify::{
    AnalysisDepth, ClassificationOptions, ClassificationResult, StreamEvent, StreamEventKind,
    StructuredClassification,
};
pub use entity::{CandidateEntity, EntityInput, MethodAttribution, RiskLevel};
pub use error::ServiceError;
pub use investigation::{CaseInvestigation, CaseInvestigationResponse};
pub use network::{
    CandidateNetworkAnalysis, NetworkAnalysis, NetworkAnalysisSummary, NetworkEdge, NetworkNode,
    NetworkStatistics, RelationshipNetwork, RelationshipQuery, TransactionNetwork,
    TransactionStatistics,
};
pub use search::{SearchMethod, SearchResponse, SearchResult};
pub use snapshot::WorkflowSnapshot;
pub use traits::{ClassificationService, InvestigationService, NetworkService, SearchService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
