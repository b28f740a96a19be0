//! Read-only workflow snapshot
//!
//! Collaborators receive snapshots and return results; they never mutate
//! workflow state. The controller owns the state and decides how to fold
//! results back in.

use crate::classify::ClassificationResult;
use crate::entity::EntityInput;
use crate::network::NetworkAnalysis;
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the workflow handed to collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    /// Entity under investigation
    pub entity: Option<EntityInput>,
    /// Merged search results
    pub search: Option<SearchResult>,
    /// Aggregated network risk analysis
    pub network: Option<NetworkAnalysis>,
    /// Final classification (structured or fallback)
    pub classification: Option<ClassificationResult>,
}

impl WorkflowSnapshot {
    /// Snapshot holding only the entity input
    #[inline]
    #[must_use]
    pub fn for_entity(entity: EntityInput) -> Self {
        Self {
            entity: Some(entity),
            ..Self::default()
        }
    }
}
