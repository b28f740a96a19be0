//! Collaborator contracts
//!
//! Narrow async contracts for the four external services the
//! orchestration core depends on. Implementations (HTTP clients,
//! database queries, LLM inference, graph traversal) live outside this
//! workspace; scripted fakes for tests live in caseflow-test-utils.

use crate::channel::StreamEventChannel;
use crate::classify::ClassificationOptions;
use crate::entity::EntityInput;
use crate::error::ServiceError;
use crate::investigation::CaseInvestigationResponse;
use crate::network::{RelationshipNetwork, RelationshipQuery, TransactionNetwork};
use crate::search::{SearchMethod, SearchResponse};
use crate::snapshot::WorkflowSnapshot;
use async_trait::async_trait;

/// Entity search back-end
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Run the requested retrieval methods for one entity input
    async fn search(
        &self,
        input: &EntityInput,
        methods: &[SearchMethod],
    ) -> Result<SearchResponse, ServiceError>;
}

/// Relationship and transaction network back-end
#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Bounded relationship network traversal around one entity
    async fn relationship_network(
        &self,
        query: &RelationshipQuery,
    ) -> Result<RelationshipNetwork, ServiceError>;

    /// Bounded transaction network traversal around one entity
    async fn transaction_network(
        &self,
        entity_id: &str,
        max_depth: u32,
    ) -> Result<TransactionNetwork, ServiceError>;
}

/// Streaming AI classification back-end
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Open one event stream for the given workflow snapshot
    ///
    /// The returned channel delivers events in strict temporal order and
    /// supports external cancellation of the in-flight call.
    async fn open_stream(
        &self,
        snapshot: &WorkflowSnapshot,
        options: &ClassificationOptions,
    ) -> Result<StreamEventChannel, ServiceError>;
}

/// Case investigation back-end
#[async_trait]
pub trait InvestigationService: Send + Sync {
    /// Assemble a case investigation from a complete workflow snapshot
    async fn create_case_investigation(
        &self,
        snapshot: &WorkflowSnapshot,
    ) -> Result<CaseInvestigationResponse, ServiceError>;
}
