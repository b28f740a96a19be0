//! Search method and result types
//!
//! Carries the raw per-method response shape returned by the search
//! service and the merged result object stored by the workflow. The
//! merged ranking is taken as provided by the service; nothing here
//! recomputes scores across methods.

use crate::entity::CandidateEntity;
use serde::{Deserialize, Serialize};

/// Retrieval methods offered by the search service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Full-text / lexical retrieval
    Lexical,
    /// Semantic vector retrieval
    Vector,
    /// Service-side fused ranking across methods
    Hybrid,
}

impl SearchMethod {
    /// All methods, in the order the coordinator issues them
    #[inline]
    #[must_use]
    pub fn all() -> [SearchMethod; 3] {
        [SearchMethod::Lexical, SearchMethod::Vector, SearchMethod::Hybrid]
    }
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMethod::Lexical => write!(f, "lexical"),
            SearchMethod::Vector => write!(f, "vector"),
            SearchMethod::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Raw response shape of one search call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Candidates ranked by the lexical method
    pub lexical_results: Vec<CandidateEntity>,
    /// Candidates ranked by the vector method
    pub vector_results: Vec<CandidateEntity>,
    /// Candidates ranked by the hybrid fused method
    pub hybrid_results: Vec<CandidateEntity>,
}

impl SearchResponse {
    /// Take the list produced by one method out of the response
    #[inline]
    #[must_use]
    pub fn into_method_results(self, method: SearchMethod) -> Vec<CandidateEntity> {
        match method {
            SearchMethod::Lexical => self.lexical_results,
            SearchMethod::Vector => self.vector_results,
            SearchMethod::Hybrid => self.hybrid_results,
        }
    }
}

/// Merged result set of one parallel search invocation
///
/// Created once per invocation and immutable thereafter. Per-method
/// ordering is exactly what the service returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Lexical ranking (empty when the method degraded)
    pub lexical: Vec<CandidateEntity>,
    /// Vector ranking (empty when the method degraded)
    pub vector: Vec<CandidateEntity>,
    /// Hybrid fused ranking, as provided by the service
    pub hybrid: Vec<CandidateEntity>,
    /// Methods whose call failed and degraded to an empty list
    pub failed_methods: Vec<SearchMethod>,
}

impl SearchResult {
    /// True when no method produced any candidate
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lexical.is_empty() && self.vector.is_empty() && self.hybrid.is_empty()
    }

    /// The merged ranking used for candidate selection
    ///
    /// The hybrid list is authoritative when present; otherwise the
    /// lexical, then vector ranking stands in for it.
    #[must_use]
    pub fn merged_ranking(&self) -> &[CandidateEntity] {
        if !self.hybrid.is_empty() {
            &self.hybrid
        } else if !self.lexical.is_empty() {
            &self.lexical
        } else {
            &self.vector
        }
    }

    /// Top `n` candidates by merged rank
    ///
    /// Stable: candidates with equal scores keep their original list
    /// order.
    #[must_use]
    pub fn top_candidates(&self, n: usize) -> Vec<CandidateEntity> {
        let mut ranked: Vec<CandidateEntity> = self.merged_ranking().to_vec();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked
    }
}
