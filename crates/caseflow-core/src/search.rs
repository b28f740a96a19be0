//! Parallel search coordination
//!
//! Issues one search call per method concurrently and merges the
//! responses. A method that fails is degraded, not fatal: its slot is
//! left empty and the method is recorded so downstream logic can see
//! what is missing. The call only fails as a whole when every method
//! fails.

use crate::error::WorkflowError;
use caseflow_services::{EntityInput, SearchMethod, SearchResult, SearchService};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans one entity out across the configured search methods
#[derive(Clone)]
pub struct ParallelSearchCoordinator {
    service: Arc<dyn SearchService>,
}

impl ParallelSearchCoordinator {
    /// Create a coordinator over the given search service
    #[inline]
    #[must_use]
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self { service }
    }

    /// Run every method concurrently and merge into one [`SearchResult`]
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::SearchUnavailable`] only when every
    /// requested method fails.
    pub async fn search(
        &self,
        input: &EntityInput,
        methods: &[SearchMethod],
    ) -> Result<SearchResult, WorkflowError> {
        let calls = methods.iter().map(|method| {
            let service = Arc::clone(&self.service);
            let method = *method;
            async move {
                let outcome = service.search(input, std::slice::from_ref(&method)).await;
                (method, outcome)
            }
        });

        let mut result = SearchResult::default();
        let mut failures = Vec::new();

        for (method, outcome) in join_all(calls).await {
            match outcome {
                Ok(response) => {
                    let candidates = response.into_method_results(method);
                    debug!(%method, count = candidates.len(), "search method completed");
                    match method {
                        SearchMethod::Lexical => result.lexical = candidates,
                        SearchMethod::Vector => result.vector = candidates,
                        SearchMethod::Hybrid => result.hybrid = candidates,
                    }
                }
                Err(err) => {
                    warn!(%method, error = %err, "search method failed, degrading");
                    result.failed_methods.push(method);
                    failures.push(format!("{method}: {err}"));
                }
            }
        }

        if !methods.is_empty() && failures.len() == methods.len() {
            return Err(WorkflowError::SearchUnavailable(failures.join("; ")));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use caseflow_services::{CandidateEntity, SearchResponse, ServiceError};

    struct OneMethodDown;

    #[async_trait]
    impl SearchService for OneMethodDown {
        async fn search(
            &self,
            _input: &EntityInput,
            methods: &[SearchMethod],
        ) -> Result<SearchResponse, ServiceError> {
            match methods.first() {
                Some(SearchMethod::Vector) => {
                    Err(ServiceError::Transport("vector index offline".to_string()))
                }
                Some(SearchMethod::Lexical) => Ok(SearchResponse {
                    lexical_results: vec![CandidateEntity::new("ent-1", "person", 0.9)],
                    ..SearchResponse::default()
                }),
                _ => Ok(SearchResponse::default()),
            }
        }
    }

    struct AllDown;

    #[async_trait]
    impl SearchService for AllDown {
        async fn search(
            &self,
            _input: &EntityInput,
            _methods: &[SearchMethod],
        ) -> Result<SearchResponse, ServiceError> {
            Err(ServiceError::Timeout { secs: 5 })
        }
    }

    fn input() -> EntityInput {
        EntityInput::new("Samantha Miller").with_attribute("address", "456 Oak Ave")
    }

    #[tokio::test]
    async fn single_method_failure_degrades() {
        let coordinator = ParallelSearchCoordinator::new(Arc::new(OneMethodDown));
        let result = coordinator
            .search(&input(), &SearchMethod::all())
            .await
            .unwrap();

        assert_eq!(result.lexical.len(), 1);
        assert!(result.vector.is_empty());
        assert_eq!(result.failed_methods, vec![SearchMethod::Vector]);
    }

    #[tokio::test]
    async fn all_methods_failing_is_unavailable() {
        let coordinator = ParallelSearchCoordinator::new(Arc::new(AllDown));
        let err = coordinator
            .search(&input(), &SearchMethod::all())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::SearchUnavailable(_)));
        assert!(err.is_retryable());
    }
}
