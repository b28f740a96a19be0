//! Case investigation types

use serde::{Deserialize, Serialize};

/// Finished case investigation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInvestigation {
    /// Case identifier assigned by the investigation service
    pub case_id: String,
    /// Human-readable investigation summary
    pub investigation_summary: String,
    /// Assembled case document
    pub case_document: String,
}

/// Raw response of the investigation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseInvestigationResponse {
    /// Whether the service accepted the request
    pub success: bool,
    /// Case identifier, on success
    pub case_id: Option<String>,
    /// Investigation summary, on success
    pub investigation_summary: Option<String>,
    /// Case document, on success
    pub case_document: Option<String>,
    /// Failure description, on failure
    pub error: Option<String>,
}

impl CaseInvestigationResponse {
    /// Successful response carrying all case fields
    #[inline]
    #[must_use]
    pub fn ok(
        case_id: impl Into<String>,
        summary: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            case_id: Some(case_id.into()),
            investigation_summary: Some(summary.into()),
            case_document: Some(document.into()),
            error: None,
        }
    }

    /// Failed response with a description
    #[inline]
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
