//! Network risk fan-out
//!
//! For each top candidate, fetches the relationship network and the
//! transaction network concurrently and folds them into a per-candidate
//! risk picture. Unlike search, this fan-out is atomic: any failed
//! fetch fails the whole analysis, since a partial risk picture would
//! silently understate exposure.

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use caseflow_services::{
    CandidateEntity, CandidateNetworkAnalysis, NetworkAnalysis, NetworkService, RelationshipQuery,
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Analyzes candidate networks concurrently, all-or-nothing
#[derive(Clone)]
pub struct NetworkRiskFanOut {
    service: Arc<dyn NetworkService>,
}

impl NetworkRiskFanOut {
    /// Create a fan-out over the given network service
    #[inline]
    #[must_use]
    pub fn new(service: Arc<dyn NetworkService>) -> Self {
        Self { service }
    }

    /// Analyze every candidate concurrently
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NetworkAnalysisFailed`] if any fetch for
    /// any candidate fails. No partial analysis is returned.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn analyze(
        &self,
        candidates: &[CandidateEntity],
        config: &WorkflowConfig,
    ) -> Result<NetworkAnalysis, WorkflowError> {
        let per_candidate = candidates
            .iter()
            .map(|candidate| self.analyze_candidate(candidate, config));

        let analyses = try_join_all(per_candidate).await?;
        Ok(NetworkAnalysis::from_candidates(analyses))
    }

    async fn analyze_candidate(
        &self,
        candidate: &CandidateEntity,
        config: &WorkflowConfig,
    ) -> Result<CandidateNetworkAnalysis, WorkflowError> {
        let query = RelationshipQuery::new(&candidate.entity_id)
            .with_max_depth(config.relationship_depth)
            .with_min_strength(config.min_strength)
            .with_inactive(config.include_inactive)
            .with_max_nodes(config.max_nodes);

        let (relationships, transactions) = tokio::try_join!(
            self.service.relationship_network(&query),
            self.service
                .transaction_network(&candidate.entity_id, config.transaction_depth),
        )
        .map_err(|err| {
            WorkflowError::NetworkAnalysisFailed(format!("{}: {err}", candidate.entity_id))
        })?;

        let network_risk = relationships.statistics.risk_score.unwrap_or(0.0);
        let transaction_risk = transactions
            .statistics
            .risk_score
            .unwrap_or_else(|| config.transaction_tiers.score(transactions.total_transactions));
        let overall = config
            .risk_weights
            .combine(candidate.risk_score, network_risk, transaction_risk);

        debug!(
            entity_id = %candidate.entity_id,
            network_risk,
            transaction_risk,
            overall,
            "candidate network analyzed"
        );

        Ok(CandidateNetworkAnalysis {
            entity_id: candidate.entity_id.clone(),
            relationship_network: relationships,
            transaction_network: transactions,
            network_risk_score: network_risk,
            transaction_risk_score: transaction_risk,
            overall_risk_score: overall,
        })
    }
}
