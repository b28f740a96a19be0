//! Case investigation building
//!
//! Final workflow stage. Packages the accumulated snapshot into a case
//! investigation via the investigation service. Entity input, search
//! results, and a classification are hard prerequisites; a missing
//! network analysis only degrades the case document.

use crate::error::WorkflowError;
use caseflow_services::{CaseInvestigation, InvestigationService, WorkflowSnapshot};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds a case investigation from a completed workflow snapshot
#[derive(Clone)]
pub struct CaseInvestigationBuilder {
    service: Arc<dyn InvestigationService>,
}

impl CaseInvestigationBuilder {
    /// Create a builder over the given investigation service
    #[inline]
    #[must_use]
    pub fn new(service: Arc<dyn InvestigationService>) -> Self {
        Self { service }
    }

    /// Build the case investigation
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IncompleteWorkflow`] when a prerequisite
    /// stage result is missing, and [`WorkflowError::InvestigationFailed`]
    /// when the service call fails or returns an incomplete case.
    pub async fn build(
        &self,
        snapshot: &WorkflowSnapshot,
    ) -> Result<CaseInvestigation, WorkflowError> {
        if snapshot.entity.is_none() {
            return Err(WorkflowError::IncompleteWorkflow {
                field: "entity input",
            });
        }
        if snapshot.search.is_none() {
            return Err(WorkflowError::IncompleteWorkflow {
                field: "search results",
            });
        }
        if snapshot.classification.is_none() {
            return Err(WorkflowError::IncompleteWorkflow {
                field: "classification",
            });
        }
        if snapshot.network.is_none() {
            warn!("building case without network analysis");
        }

        let response = self
            .service
            .create_case_investigation(snapshot)
            .await
            .map_err(|err| WorkflowError::InvestigationFailed(err.to_string()))?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "case creation rejected".to_string());
            return Err(WorkflowError::InvestigationFailed(message));
        }

        match (
            response.case_id,
            response.investigation_summary,
            response.case_document,
        ) {
            (Some(case_id), Some(investigation_summary), Some(case_document)) => {
                info!(%case_id, "case investigation created");
                Ok(CaseInvestigation {
                    case_id,
                    investigation_summary,
                    case_document,
                })
            }
            _ => Err(WorkflowError::InvestigationFailed(
                "case response missing required fields".to_string(),
            )),
        }
    }
}
