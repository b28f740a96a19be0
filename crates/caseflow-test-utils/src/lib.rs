//! Scripted service fakes and fixtures for caseflow tests
//!
//! Every fake is deterministic: it replays exactly what it was
//! configured with, so tests assert on behavior rather than on live
//! service responses.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use async_trait::async_trait;
use caseflow_services::{
    channel, CandidateEntity, CaseInvestigationResponse, ClassificationOptions,
    ClassificationService, EntityInput, InvestigationService, NetworkService, NetworkStatistics,
    RelationshipNetwork, RelationshipQuery, SearchMethod, SearchResponse, SearchService,
    ServiceError, StreamEventChannel, StreamEventKind, TransactionNetwork, TransactionStatistics,
    WorkflowSnapshot,
};

/// Search fake replaying fixed per-method candidate lists
///
/// Methods listed in `failing` fail with a transport error; everything
/// else returns its configured list, empty by default.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSearchService {
    pub lexical: Vec<CandidateEntity>,
    pub vector: Vec<CandidateEntity>,
    pub hybrid: Vec<CandidateEntity>,
    pub failing: Vec<SearchMethod>,
}

impl ScriptedSearchService {
    #[must_use]
    pub fn with_hybrid(mut self, candidates: Vec<CandidateEntity>) -> Self {
        self.hybrid = candidates;
        self
    }

    #[must_use]
    pub fn with_lexical(mut self, candidates: Vec<CandidateEntity>) -> Self {
        self.lexical = candidates;
        self
    }

    #[must_use]
    pub fn with_failing(mut self, methods: Vec<SearchMethod>) -> Self {
        self.failing = methods;
        self
    }
}

#[async_trait]
impl SearchService for ScriptedSearchService {
    async fn search(
        &self,
        _input: &EntityInput,
        methods: &[SearchMethod],
    ) -> Result<SearchResponse, ServiceError> {
        if let Some(method) = methods.iter().find(|m| self.failing.contains(m)) {
            return Err(ServiceError::Transport(format!("{method} search down")));
        }

        let mut response = SearchResponse::default();
        for method in methods {
            match method {
                SearchMethod::Lexical => response.lexical_results = self.lexical.clone(),
                SearchMethod::Vector => response.vector_results = self.vector.clone(),
                SearchMethod::Hybrid => response.hybrid_results = self.hybrid.clone(),
            }
        }
        Ok(response)
    }
}

/// Network fake replaying fixed risk figures for every entity
#[derive(Debug, Clone, Default)]
pub struct ScriptedNetworkService {
    pub network_risk: Option<f64>,
    pub transaction_risk: Option<f64>,
    pub total_transactions: u64,
    /// Entity whose relationship fetch fails, when set
    pub fail_relationship_for: Option<String>,
}

impl ScriptedNetworkService {
    #[must_use]
    pub fn with_risks(mut self, network: f64, transaction: f64) -> Self {
        self.network_risk = Some(network);
        self.transaction_risk = Some(transaction);
        self
    }

    #[must_use]
    pub fn failing_for(mut self, entity_id: impl Into<String>) -> Self {
        self.fail_relationship_for = Some(entity_id.into());
        self
    }
}

#[async_trait]
impl NetworkService for ScriptedNetworkService {
    async fn relationship_network(
        &self,
        query: &RelationshipQuery,
    ) -> Result<RelationshipNetwork, ServiceError> {
        if self.fail_relationship_for.as_deref() == Some(query.entity_id.as_str()) {
            return Err(ServiceError::Remote("relationship graph unavailable".to_string()));
        }
        Ok(RelationshipNetwork {
            statistics: NetworkStatistics {
                risk_score: self.network_risk,
                ..NetworkStatistics::default()
            },
            ..RelationshipNetwork::default()
        })
    }

    async fn transaction_network(
        &self,
        _entity_id: &str,
        _max_depth: u32,
    ) -> Result<TransactionNetwork, ServiceError> {
        Ok(TransactionNetwork {
            total_transactions: self.total_transactions,
            statistics: TransactionStatistics {
                risk_score: self.transaction_risk,
                ..TransactionStatistics::default()
            },
        })
    }
}

/// Classification fake that replays a scripted event sequence
///
/// `open_stream` spawns a producer task that emits the script in order.
/// With `park_after` set, the producer then waits for an abort instead
/// of closing the channel, which keeps the stream open for cancellation
/// tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClassificationService {
    pub script: Vec<StreamEventKind>,
    pub park_after: bool,
    /// Fail the open call itself, when set
    pub refuse_open: bool,
}

impl ScriptedClassificationService {
    #[must_use]
    pub fn with_script(script: Vec<StreamEventKind>) -> Self {
        Self {
            script,
            park_after: false,
            refuse_open: false,
        }
    }

    #[must_use]
    pub fn parked_after_script(mut self) -> Self {
        self.park_after = true;
        self
    }
}

#[async_trait]
impl ClassificationService for ScriptedClassificationService {
    async fn open_stream(
        &self,
        _snapshot: &WorkflowSnapshot,
        _options: &ClassificationOptions,
    ) -> Result<StreamEventChannel, ServiceError> {
        if self.refuse_open {
            return Err(ServiceError::Remote("classification service refused".to_string()));
        }

        let (tx, rx) = channel(64);
        let script = self.script.clone();
        let park = self.park_after;
        tokio::spawn(async move {
            for kind in script {
                if !tx.emit(kind).await {
                    return;
                }
                tokio::task::yield_now().await;
            }
            if park {
                tx.cancelled().await;
            }
        });
        Ok(rx)
    }
}

/// Investigation fake replaying one fixed response
#[derive(Debug, Clone)]
pub struct ScriptedInvestigationService {
    pub response: CaseInvestigationResponse,
}

impl ScriptedInvestigationService {
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            response: CaseInvestigationResponse::ok(
                "case-2024-001",
                "Investigation of matched entity",
                "Full case document",
            ),
        }
    }

    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            response: CaseInvestigationResponse::failed(error),
        }
    }
}

#[async_trait]
impl InvestigationService for ScriptedInvestigationService {
    async fn create_case_investigation(
        &self,
        _snapshot: &WorkflowSnapshot,
    ) -> Result<CaseInvestigationResponse, ServiceError> {
        Ok(self.response.clone())
    }
}

/// Standard test entity input
#[must_use]
pub fn sample_entity() -> EntityInput {
    EntityInput::new("Samantha Miller")
        .with_attribute("address", "456 Oak Ave")
        .with_attribute("date_of_birth", "1985-03-12")
}

/// Candidate with the given id and match score
#[must_use]
pub fn candidate(entity_id: &str, score: f64) -> CandidateEntity {
    CandidateEntity::new(entity_id, "person", score).with_risk_score(score * 0.5)
}

/// Three ranked candidates, highest score first
#[must_use]
pub fn three_candidates() -> Vec<CandidateEntity> {
    vec![
        candidate("ent-1", 0.95),
        candidate("ent-2", 0.82),
        candidate("ent-3", 0.67),
    ]
}

/// Event script for a complete, well-formed classification stream
#[must_use]
pub fn complete_stream_script(chunks: &[&str]) -> Vec<StreamEventKind> {
    let mut script = vec![
        StreamEventKind::PromptReady {
            prompt: "Assess the matched entity".to_string(),
            model: "risk-classifier-v2".to_string(),
        },
        StreamEventKind::LlmStart,
    ];
    script.extend(chunks.iter().map(|chunk| StreamEventKind::LlmChunk {
        chunk: (*chunk).to_string(),
    }));
    script.push(StreamEventKind::ProcessingStart);
    script.push(StreamEventKind::ClassificationComplete {
        classification: None,
        raw_response: None,
    });
    script
}
