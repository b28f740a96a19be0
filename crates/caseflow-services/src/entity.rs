//! Candidate identity types
//!
//! The raw material of an investigation:
//! - The entity input supplied by the caller
//! - Candidate entities returned by the search back-ends
//! - Risk levels used across classification and network analysis

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Candidate identity submitted to start an investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInput {
    /// Display name of the entity under investigation
    pub name: String,
    /// Identifying attributes (address, date of birth, id number, ...)
    pub attributes: BTreeMap<String, String>,
}

impl EntityInput {
    /// Create an input with just a display name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an identifying attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// An input is valid when it carries a non-empty display name and
    /// at least one identifying attribute with a non-empty value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self.attributes.values().any(|v| !v.trim().is_empty())
    }
}

/// A ranked candidate entity from one of the search back-ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntity {
    /// Stable identifier in the entity store
    pub entity_id: String,
    /// Entity type (person, organization, ...)
    pub entity_type: String,
    /// Match score assigned by the producing method
    pub score: f64,
    /// Risk score carried from the search service's own assessment
    pub risk_score: Option<f64>,
    /// Per-method attribution for hybrid-ranked candidates
    pub attribution: Option<MethodAttribution>,
}

impl CandidateEntity {
    /// Create a candidate with the required fields
    #[inline]
    #[must_use]
    pub fn new(entity_id: impl Into<String>, entity_type: impl Into<String>, score: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type: entity_type.into(),
            score,
            risk_score: None,
            attribution: None,
        }
    }

    /// With a search-supplied risk score
    #[inline]
    #[must_use]
    pub fn with_risk_score(mut self, risk_score: f64) -> Self {
        self.risk_score = Some(risk_score);
        self
    }

    /// With method attribution
    #[inline]
    #[must_use]
    pub fn with_attribution(mut self, attribution: MethodAttribution) -> Self {
        self.attribution = Some(attribution);
        self
    }
}

/// Percentage contribution of each method to a hybrid-ranked candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodAttribution {
    /// Contribution of the lexical method
    pub lexical_pct: f64,
    /// Contribution of the vector method
    pub vector_pct: f64,
}

/// Risk level buckets used by classification output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Routine match, no elevated indicators
    Low,
    /// Some indicators, monitor
    Medium,
    /// Strong indicators, escalate
    High,
    /// Immediate action required
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_input_validity() {
        let empty = EntityInput::new("");
        assert!(!empty.is_valid());

        let name_only = EntityInput::new("Samantha Miller");
        assert!(!name_only.is_valid());

        let blank_attr = EntityInput::new("Samantha Miller").with_attribute("address", "  ");
        assert!(!blank_attr.is_valid());

        let valid = EntityInput::new("Samantha Miller").with_attribute("address", "456 Oak Ave");
        assert!(valid.is_valid());
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn risk_level_serde_tags() {
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"high\"");
        let level: RiskLevel = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(level, RiskLevel::Critical);
    }

    #[test]
    fn candidate_builder() {
        let candidate = CandidateEntity::new("ent-1", "person", 0.92)
            .with_risk_score(0.4)
            .with_attribution(MethodAttribution {
                lexical_pct: 60.0,
                vector_pct: 40.0,
            });

        assert_eq!(candidate.entity_id, "ent-1");
        assert_eq!(candidate.risk_score, Some(0.4));
        assert!(candidate.attribution.is_some());
    }
}
