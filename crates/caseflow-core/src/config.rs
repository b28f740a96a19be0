//! Workflow configuration
//!
//! Traversal bounds, candidate selection, classification options, and
//! the risk scoring knobs. The transaction volume tiers are configuration
//! rather than hard-coded thresholds because the proxy heuristic has no
//! independent validation; deployments tune it.

use caseflow_services::{ClassificationOptions, SearchMethod};
use serde::{Deserialize, Serialize};

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Candidates selected for network analysis, by merged rank
    pub top_candidates: usize,
    /// Retrieval methods issued by the parallel search
    pub search_methods: Vec<SearchMethod>,
    /// Relationship network traversal depth
    pub relationship_depth: u32,
    /// Transaction network traversal depth
    pub transaction_depth: u32,
    /// Minimum relationship strength to follow
    pub min_strength: f64,
    /// Node cap for relationship traversals
    pub max_nodes: u32,
    /// Whether to traverse inactive relationships
    pub include_inactive: bool,
    /// Options passed to the classification service
    pub classification: ClassificationOptions,
    /// Weights for combining per-candidate risk scores
    pub risk_weights: RiskWeights,
    /// Transaction-volume proxy risk tiers
    pub transaction_tiers: TransactionRiskTiers,
}

impl WorkflowConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With candidate selection count
    #[inline]
    #[must_use]
    pub fn with_top_candidates(mut self, n: usize) -> Self {
        self.top_candidates = n;
        self
    }

    /// With retrieval methods
    #[inline]
    #[must_use]
    pub fn with_search_methods(mut self, methods: Vec<SearchMethod>) -> Self {
        self.search_methods = methods;
        self
    }

    /// With classification options
    #[inline]
    #[must_use]
    pub fn with_classification(mut self, options: ClassificationOptions) -> Self {
        self.classification = options;
        self
    }

    /// With risk combination weights
    #[inline]
    #[must_use]
    pub fn with_risk_weights(mut self, weights: RiskWeights) -> Self {
        self.risk_weights = weights;
        self
    }

    /// With transaction volume tiers
    #[inline]
    #[must_use]
    pub fn with_transaction_tiers(mut self, tiers: TransactionRiskTiers) -> Self {
        self.transaction_tiers = tiers;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            top_candidates: 3,
            search_methods: SearchMethod::all().to_vec(),
            relationship_depth: 2,
            transaction_depth: 1,
            min_strength: 0.0,
            max_nodes: 200,
            include_inactive: false,
            classification: ClassificationOptions::default(),
            risk_weights: RiskWeights::default(),
            transaction_tiers: TransactionRiskTiers::default(),
        }
    }
}

/// Weights for combining a candidate's risk components
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Candidate's own risk score from search
    pub own: f64,
    /// Relationship network risk
    pub network: f64,
    /// Transaction risk (direct or proxy)
    pub transaction: f64,
}

impl RiskWeights {
    /// Weighted combination of the three risk components
    ///
    /// A candidate without an own risk score drops that term and its
    /// weight rather than counting it as zero risk.
    #[must_use]
    pub fn combine(&self, own: Option<f64>, network: f64, transaction: f64) -> f64 {
        let mut total = self.network * network + self.transaction * transaction;
        let mut weight = self.network + self.transaction;
        if let Some(own) = own {
            total += self.own * own;
            weight += self.own;
        }
        if weight == 0.0 {
            0.0
        } else {
            total / weight
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            own: 0.4,
            network: 0.4,
            transaction: 0.2,
        }
    }
}

/// Transaction-volume proxy risk tiers
///
/// Used only when the network service supplies no direct transaction
/// risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransactionRiskTiers {
    /// Volume above which the high tier applies
    pub high_threshold: u64,
    /// Risk assigned to the high tier
    pub high_risk: f64,
    /// Volume above which the medium tier applies
    pub medium_threshold: u64,
    /// Risk assigned to the medium tier
    pub medium_risk: f64,
    /// Volume above which the low tier applies
    pub low_threshold: u64,
    /// Risk assigned to the low tier
    pub low_risk: f64,
    /// Risk assigned below every threshold
    pub minimal_risk: f64,
}

impl TransactionRiskTiers {
    /// Proxy risk for a transaction volume
    #[must_use]
    pub fn score(&self, total_transactions: u64) -> f64 {
        if total_transactions > self.high_threshold {
            self.high_risk
        } else if total_transactions > self.medium_threshold {
            self.medium_risk
        } else if total_transactions > self.low_threshold {
            self.low_risk
        } else {
            self.minimal_risk
        }
    }
}

impl Default for TransactionRiskTiers {
    fn default() -> Self {
        Self {
            high_threshold: 100,
            high_risk: 0.8,
            medium_threshold: 50,
            medium_risk: 0.5,
            low_threshold: 10,
            low_risk: 0.3,
            minimal_risk: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WorkflowConfig::new();
        assert_eq!(config.top_candidates, 3);
        assert_eq!(config.relationship_depth, 2);
        assert_eq!(config.transaction_depth, 1);
        assert_eq!(config.search_methods.len(), 3);
    }

    #[test]
    fn config_builder() {
        let config = WorkflowConfig::new()
            .with_top_candidates(5)
            .with_search_methods(vec![SearchMethod::Hybrid]);
        assert_eq!(config.top_candidates, 5);
        assert_eq!(config.search_methods, vec![SearchMethod::Hybrid]);
    }

    #[test]
    fn volume_tiers() {
        let tiers = TransactionRiskTiers::default();
        assert_eq!(tiers.score(150), 0.8);
        assert_eq!(tiers.score(101), 0.8);
        assert_eq!(tiers.score(100), 0.5);
        assert_eq!(tiers.score(51), 0.5);
        assert_eq!(tiers.score(50), 0.3);
        assert_eq!(tiers.score(11), 0.3);
        assert_eq!(tiers.score(10), 0.1);
        assert_eq!(tiers.score(0), 0.1);
    }

    #[test]
    fn weights_skip_missing_own_score() {
        let weights = RiskWeights::default();

        let with_own = weights.combine(Some(0.5), 0.5, 0.5);
        assert!((with_own - 0.5).abs() < 1e-9);

        // Without an own score the remaining terms are renormalized.
        let without_own = weights.combine(None, 0.6, 0.6);
        assert!((without_own - 0.6).abs() < 1e-9);
    }
}
