//! Classification stream events and results
//!
//! The streaming classification service emits a strict temporal sequence
//! of [`StreamEvent`]s over one channel per call. The consumer folds the
//! chunk events into a raw text buffer and finalizes either a structured
//! classification or an unstructured fallback that preserves the raw
//! text, so downstream investigation building never loses information.

use crate::entity::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Discrete event on a classification stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Event payload
    #[serde(flatten)]
    pub kind: StreamEventKind,
    /// Emission timestamp
    pub timestamp: DateTime<Utc>,
}

impl StreamEvent {
    /// Stamp an event with the current time
    #[inline]
    #[must_use]
    pub fn new(kind: StreamEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Tagged union of classification stream events
///
/// Delivered in strict temporal order by the service. Consumers must
/// match exhaustively so new event kinds cannot fall through unhandled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEventKind {
    /// The classification prompt was assembled
    PromptReady {
        /// Full prompt sent to the model, kept for audit
        prompt: String,
        /// Model identifier
        model: String,
    },
    /// Token streaming began
    LlmStart,
    /// One streamed text chunk
    LlmChunk {
        /// Chunk payload
        chunk: String,
    },
    /// Streaming finished, server-side structuring began
    ProcessingStart,
    /// Terminal: classification finished
    ClassificationComplete {
        /// Structured record, when the service produced one
        classification: Option<StructuredClassification>,
        /// Raw-response preview from the service
        raw_response: Option<String>,
    },
    /// Terminal: the stream failed
    Error {
        /// Failure description
        message: String,
    },
}

impl StreamEventKind {
    /// Terminal events end the stream; later events must be ignored
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEventKind::ClassificationComplete { .. } | StreamEventKind::Error { .. }
        )
    }
}

/// Structured classification record produced by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredClassification {
    /// Risk score in [0, 1]
    pub risk_score: f64,
    /// Risk bucket
    pub risk_level: RiskLevel,
    /// Recommended next action
    pub recommended_action: String,
    /// Flags raised during classification
    #[serde(default)]
    pub flags: Vec<String>,
    /// Model rationale
    #[serde(default)]
    pub rationale: String,
}

/// Final classification outcome stored in the workflow
///
/// Always carries `raw_ai_response` (the full ordered chunk
/// concatenation) and the streaming metadata, whether or not
/// structuring succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Structured record, absent when structuring failed
    pub structured: Option<StructuredClassification>,
    /// True when only raw text is available
    pub unstructured: bool,
    /// Full concatenated stream text
    pub raw_ai_response: String,
    /// Model that produced the response
    pub model: Option<String>,
    /// Prompt recorded for audit
    pub prompt: Option<String>,
    /// Number of chunks received
    pub chunk_count: usize,
    /// Wall time spent streaming
    pub stream_duration: Duration,
}

/// Analysis depth requested from the classification service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    /// Single-pass classification
    Standard,
    /// Extended multi-pass analysis
    Deep,
}

/// Options for one classification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationOptions {
    /// Model identifier
    pub model: String,
    /// Requested analysis depth
    pub analysis_depth: AnalysisDepth,
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            model: "risk-classifier-v2".to_string(),
            analysis_depth: AnalysisDepth::Standard,
        }
    }
}
