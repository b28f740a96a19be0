//! Network analysis types
//!
//! Relationship and transaction network shapes returned by the network
//! service, the query descriptor sent to it, and the per-candidate
//! analysis records the fan-out produces from them.

use serde::{Deserialize, Serialize};

/// A node in a relationship network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkNode {
    /// Entity identifier
    pub entity_id: String,
    /// Entity type
    pub entity_type: String,
    /// Traversal depth at which this node was reached
    pub depth: u32,
}

/// An edge in a relationship network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEdge {
    /// Source entity
    pub source: String,
    /// Target entity
    pub target: String,
    /// Relationship type
    pub relationship: String,
    /// Relationship strength in [0, 1]
    pub strength: f64,
}

/// Statistics over a relationship network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkStatistics {
    /// Number of nodes
    pub node_count: usize,
    /// Number of edges
    pub edge_count: usize,
    /// Mean edge strength
    pub average_strength: f64,
    /// Risk score computed by the service, when available
    pub risk_score: Option<f64>,
}

/// Relationship network around one entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipNetwork {
    /// Network nodes
    pub nodes: Vec<NetworkNode>,
    /// Network edges
    pub edges: Vec<NetworkEdge>,
    /// Aggregate statistics
    pub statistics: NetworkStatistics,
}

/// Statistics over a transaction network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionStatistics {
    /// Total transacted volume
    pub total_volume: f64,
    /// Distinct counterparties
    pub counterparty_count: usize,
    /// Risk score computed by the service, when available
    pub risk_score: Option<f64>,
}

/// Transaction network around one entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionNetwork {
    /// Total transactions observed within the traversal
    pub total_transactions: u64,
    /// Aggregate statistics
    pub statistics: TransactionStatistics,
}

/// Query descriptor for a relationship network traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipQuery {
    /// Root entity
    pub entity_id: String,
    /// Bounded traversal depth
    pub max_depth: u32,
    /// Minimum edge strength to follow
    pub min_strength: f64,
    /// Whether to traverse inactive relationships
    pub include_inactive: bool,
    /// Node cap for the traversal
    pub max_nodes: u32,
    /// Restrict to these relationship types, when set
    pub type_filter: Option<Vec<String>>,
}

impl RelationshipQuery {
    /// Create a query with default traversal bounds
    #[inline]
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            max_depth: 2,
            min_strength: 0.0,
            include_inactive: false,
            max_nodes: 200,
            type_filter: None,
        }
    }

    /// With traversal depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With minimum edge strength
    #[inline]
    #[must_use]
    pub fn with_min_strength(mut self, min_strength: f64) -> Self {
        self.min_strength = min_strength;
        self
    }

    /// Include inactive relationships
    #[inline]
    #[must_use]
    pub fn with_inactive(mut self, include_inactive: bool) -> Self {
        self.include_inactive = include_inactive;
        self
    }

    /// With node cap
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: u32) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Restrict to relationship types
    #[inline]
    #[must_use]
    pub fn with_type_filter(mut self, types: Vec<String>) -> Self {
        self.type_filter = Some(types);
        self
    }
}

/// Per-candidate record produced by the network risk fan-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateNetworkAnalysis {
    /// Candidate entity
    pub entity_id: String,
    /// Relationship network traversal
    pub relationship_network: RelationshipNetwork,
    /// Transaction network traversal
    pub transaction_network: TransactionNetwork,
    /// Risk derived from the relationship network
    pub network_risk_score: f64,
    /// Risk derived from transactions (service score or volume proxy)
    pub transaction_risk_score: f64,
    /// Combined per-candidate risk
    pub overall_risk_score: f64,
}

/// Aggregate summary over all analyzed candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkAnalysisSummary {
    /// Candidates analyzed
    pub analyzed: usize,
    /// Sum of overall risk scores
    pub total_risk: f64,
    /// Mean overall risk score
    pub average_risk: f64,
}

/// Result of one network risk fan-out invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    /// Per-candidate detail
    pub candidates: Vec<CandidateNetworkAnalysis>,
    /// Aggregate summary
    pub summary: NetworkAnalysisSummary,
}

impl NetworkAnalysis {
    /// Build an analysis from per-candidate records, computing the summary
    #[must_use]
    pub fn from_candidates(candidates: Vec<CandidateNetworkAnalysis>) -> Self {
        let analyzed = candidates.len();
        let total_risk: f64 = candidates.iter().map(|c| c.overall_risk_score).sum();
        let average_risk = if analyzed == 0 {
            0.0
        } else {
            total_risk / analyzed as f64
        };

        Self {
            candidates,
            summary: NetworkAnalysisSummary {
                analyzed,
                total_risk,
                average_risk,
            },
        }
    }
}
