//! Streaming classification consumer
//!
//! Consumes one stream event channel per classification attempt,
//! maintains the classification phase machine, folds chunk events into
//! the raw text buffer, and produces a final structured-or-fallback
//! result. Cooperative cancellation is distinguished from genuine
//! failure: deliberate aborts reset the consumer for a fresh start and
//! never surface as errors.

use crate::phase::{validate_transition, ClassificationPhase};
use caseflow_services::{
    AbortReason, ClassificationOptions, ClassificationResult, ClassificationService, ServiceError,
    StreamAbortHandle, StreamEvent, StreamEventChannel, StreamEventKind, StructuredClassification,
    WorkflowSnapshot,
};
use std::time::{Duration, Instant};

/// Terminal outcome of one classification attempt
#[derive(Debug, Clone)]
pub enum ClassificationOutcome {
    /// Stream finished; result finalized
    Complete(ClassificationResult),
    /// Stream failed
    Failed {
        /// Failure description
        message: String,
        /// Chunks received before the failure
        chunk_count: usize,
        /// Streaming time elapsed at the point of failure
        elapsed: Duration,
    },
    /// Stream deliberately cancelled; not a failure
    Cancelled {
        /// Recorded abort reason
        reason: AbortReason,
    },
}

/// Consumer of one classification stream at a time
#[derive(Debug)]
pub struct StreamingClassificationConsumer {
    phase: ClassificationPhase,
    channel: Option<StreamEventChannel>,
    buffer: String,
    chunk_count: usize,
    model: Option<String>,
    prompt: Option<String>,
    started_at: Option<Instant>,
    stream_elapsed: Option<Duration>,
    finished: bool,
}

impl StreamingClassificationConsumer {
    /// Create an idle consumer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: ClassificationPhase::Starting,
            channel: None,
            buffer: String::new(),
            chunk_count: 0,
            model: None,
            prompt: None,
            started_at: None,
            stream_elapsed: None,
            finished: false,
        }
    }

    /// Open a classification stream for the given snapshot
    ///
    /// No-op when a channel is already attached, so rapid repeated calls
    /// cannot trigger duplicate remote classification calls.
    ///
    /// # Errors
    /// - `ServiceError` when the classification service refuses the call
    pub async fn start(
        &mut self,
        service: &dyn ClassificationService,
        snapshot: &WorkflowSnapshot,
        options: &ClassificationOptions,
    ) -> Result<(), ServiceError> {
        if self.channel.is_some() {
            tracing::debug!("classification stream already open, start is a no-op");
            return Ok(());
        }

        let channel = service.open_stream(snapshot, options).await?;
        self.attach(channel);
        Ok(())
    }

    /// Attach an open channel, resetting per-attempt state
    ///
    /// No-op when a channel is already attached; this is the
    /// single-flight guard point.
    pub fn attach(&mut self, channel: StreamEventChannel) {
        if self.channel.is_some() {
            tracing::debug!("channel already attached, ignoring");
            return;
        }
        self.reset_attempt();
        self.channel = Some(channel);
    }

    /// True while a stream is open for this consumer
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.channel.is_some()
    }

    /// Handle that aborts the open stream from outside the receive loop
    #[must_use]
    pub fn abort_handle(&self) -> Option<StreamAbortHandle> {
        self.channel.as_ref().map(StreamEventChannel::abort_handle)
    }

    /// Current classification phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> ClassificationPhase {
        self.phase
    }

    /// Chunks received so far
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Accumulated raw text so far
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Process one stream event, in arrival order
    ///
    /// The sole event-processing entry point. Returns the terminal
    /// outcome exactly once; events after a terminal are ignored.
    pub fn process_event(&mut self, event: StreamEvent) -> Option<ClassificationOutcome> {
        if self.finished {
            tracing::debug!("event after terminal, ignoring");
            return None;
        }

        match event.kind {
            StreamEventKind::PromptReady { prompt, model } => {
                self.advance(ClassificationPhase::PromptReady);
                tracing::debug!(model = %model, "classification prompt ready");
                self.prompt = Some(prompt);
                self.model = Some(model);
                None
            }
            StreamEventKind::LlmStart => {
                self.advance(ClassificationPhase::LlmStreaming);
                self.buffer.clear();
                self.chunk_count = 0;
                self.started_at = Some(Instant::now());
                None
            }
            StreamEventKind::LlmChunk { chunk } => {
                // Pure fold: buffer == concat(chunks in arrival order).
                self.buffer.push_str(&chunk);
                self.chunk_count += 1;
                tracing::trace!(
                    chunks = self.chunk_count,
                    length = self.buffer.len(),
                    "chunk received"
                );
                None
            }
            StreamEventKind::ProcessingStart => {
                self.advance(ClassificationPhase::Processing);
                self.stream_elapsed = Some(self.elapsed());
                None
            }
            StreamEventKind::ClassificationComplete {
                classification,
                raw_response,
            } => {
                // Terminal events are honored regardless of phase.
                self.phase = ClassificationPhase::Complete;
                self.finished = true;
                let result = self.finalize(classification, raw_response);
                tracing::info!(
                    chunks = result.chunk_count,
                    structured = result.structured.is_some(),
                    "classification complete"
                );
                Some(ClassificationOutcome::Complete(result))
            }
            StreamEventKind::Error { message } => {
                self.phase = ClassificationPhase::Error;
                self.finished = true;
                let elapsed = self.elapsed();
                tracing::warn!(chunks = self.chunk_count, %message, "classification stream failed");
                Some(ClassificationOutcome::Failed {
                    message,
                    chunk_count: self.chunk_count,
                    elapsed,
                })
            }
        }
    }

    /// Drive the attached channel to its terminal outcome
    ///
    /// A channel that ends without a terminal event maps the recorded
    /// abort reason: deliberate aborts reset the consumer and yield
    /// `Cancelled`; anything else is a failure.
    pub async fn run(&mut self) -> ClassificationOutcome {
        loop {
            let Some(channel) = self.channel.as_mut() else {
                return ClassificationOutcome::Cancelled {
                    reason: AbortReason::Teardown,
                };
            };

            match channel.next_event().await {
                Some(event) => {
                    if let Some(outcome) = self.process_event(event) {
                        self.channel = None;
                        return outcome;
                    }
                }
                None => {
                    let reason = channel.abort_reason();
                    self.channel = None;
                    return self.close_without_terminal(reason);
                }
            }
        }
    }

    /// Abort the open stream
    ///
    /// Idempotent. Deliberate reasons reset the phase to `Starting` with
    /// no failure outcome, so a fresh `start()` is possible; a `Failure`
    /// reason produces the failed outcome once.
    pub fn cancel(&mut self, reason: AbortReason) -> Option<ClassificationOutcome> {
        if let Some(channel) = &self.channel {
            channel.abort(reason);
        }
        self.channel = None;

        if self.finished {
            return None;
        }

        if reason.is_deliberate() {
            tracing::info!(?reason, "classification cancelled");
            self.reset_attempt();
            None
        } else {
            self.phase = ClassificationPhase::Error;
            self.finished = true;
            Some(ClassificationOutcome::Failed {
                message: "classification aborted by failure".to_string(),
                chunk_count: self.chunk_count,
                elapsed: self.elapsed(),
            })
        }
    }

    /// Apply a non-terminal phase transition, ignoring out-of-order events
    fn advance(&mut self, to: ClassificationPhase) {
        match validate_transition(self.phase, to) {
            Ok(()) => self.phase = to,
            Err(err) => {
                tracing::warn!(%err, "out-of-order stream event");
            }
        }
    }

    /// Finalize the result from the terminal completion event
    ///
    /// Structured fields come from, in priority order: the service's
    /// structured record, a parse of the service's raw-response preview,
    /// a parse of the locally accumulated buffer. The raw text and
    /// streaming metadata are carried regardless.
    fn finalize(
        &mut self,
        structured: Option<StructuredClassification>,
        raw_preview: Option<String>,
    ) -> ClassificationResult {
        let raw_ai_response = if self.buffer.is_empty() {
            raw_preview.clone().unwrap_or_default()
        } else {
            self.buffer.clone()
        };

        let structured = structured
            .or_else(|| raw_preview.as_deref().and_then(try_parse_structured))
            .or_else(|| try_parse_structured(&self.buffer));

        ClassificationResult {
            unstructured: structured.is_none(),
            structured,
            raw_ai_response,
            model: self.model.clone(),
            prompt: self.prompt.clone(),
            chunk_count: self.chunk_count,
            stream_duration: self.stream_elapsed.unwrap_or_else(|| self.elapsed()),
        }
    }

    /// Map a channel that closed without a terminal event to an outcome
    fn close_without_terminal(&mut self, reason: Option<AbortReason>) -> ClassificationOutcome {
        match reason {
            Some(reason) if reason.is_deliberate() => {
                tracing::info!(?reason, "classification cancelled");
                self.reset_attempt();
                ClassificationOutcome::Cancelled { reason }
            }
            Some(AbortReason::Failure) => {
                self.phase = ClassificationPhase::Error;
                self.finished = true;
                ClassificationOutcome::Failed {
                    message: "classification aborted by failure".to_string(),
                    chunk_count: self.chunk_count,
                    elapsed: self.elapsed(),
                }
            }
            _ => {
                self.phase = ClassificationPhase::Error;
                self.finished = true;
                ClassificationOutcome::Failed {
                    message: "stream closed before completion".to_string(),
                    chunk_count: self.chunk_count,
                    elapsed: self.elapsed(),
                }
            }
        }
    }

    /// Streaming time elapsed so far
    fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Reset to a fresh attempt
    fn reset_attempt(&mut self) {
        self.phase = ClassificationPhase::Starting;
        self.buffer.clear();
        self.chunk_count = 0;
        self.model = None;
        self.prompt = None;
        self.started_at = None;
        self.stream_elapsed = None;
        self.finished = false;
    }
}

impl Default for StreamingClassificationConsumer {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempt to parse raw stream text as a structured classification
fn try_parse_structured(text: &str) -> Option<StructuredClassification> {
    serde_json::from_str(text.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_services::channel;

    fn event(kind: StreamEventKind) -> StreamEvent {
        StreamEvent::new(kind)
    }

    fn chunk(text: &str) -> StreamEvent {
        event(StreamEventKind::LlmChunk {
            chunk: text.to_string(),
        })
    }

    fn attached_consumer() -> StreamingClassificationConsumer {
        let (_tx, rx) = channel(8);
        let mut consumer = StreamingClassificationConsumer::new();
        consumer.attach(rx);
        consumer
    }

    #[test]
    fn phases_follow_event_order() {
        let mut consumer = attached_consumer();
        assert_eq!(consumer.phase(), ClassificationPhase::Starting);

        consumer.process_event(event(StreamEventKind::PromptReady {
            prompt: "classify".to_string(),
            model: "risk-classifier-v2".to_string(),
        }));
        assert_eq!(consumer.phase(), ClassificationPhase::PromptReady);

        consumer.process_event(event(StreamEventKind::LlmStart));
        assert_eq!(consumer.phase(), ClassificationPhase::LlmStreaming);

        consumer.process_event(chunk("risk"));
        assert_eq!(consumer.phase(), ClassificationPhase::LlmStreaming);

        consumer.process_event(event(StreamEventKind::ProcessingStart));
        assert_eq!(consumer.phase(), ClassificationPhase::Processing);
    }

    #[test]
    fn buffer_is_ordered_concatenation() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        for text in ["a", "b", "c"] {
            consumer.process_event(chunk(text));
        }
        assert_eq!(consumer.buffer(), "abc");
        assert_eq!(consumer.chunk_count(), 3);
    }

    #[test]
    fn llm_start_resets_buffer() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("stale"));
        consumer.process_event(event(StreamEventKind::LlmStart));
        assert_eq!(consumer.buffer(), "");
        assert_eq!(consumer.chunk_count(), 0);
    }

    #[test]
    fn complete_finalizes_with_service_structured_record() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("raw text"));

        let structured = StructuredClassification {
            risk_score: 0.8,
            risk_level: caseflow_services::RiskLevel::High,
            recommended_action: "escalate".to_string(),
            flags: vec![],
            rationale: String::new(),
        };
        let outcome = consumer
            .process_event(event(StreamEventKind::ClassificationComplete {
                classification: Some(structured.clone()),
                raw_response: None,
            }))
            .expect("terminal outcome");

        match outcome {
            ClassificationOutcome::Complete(result) => {
                assert_eq!(result.structured, Some(structured));
                assert!(!result.unstructured);
                assert_eq!(result.raw_ai_response, "raw text");
                assert_eq!(result.chunk_count, 1);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert_eq!(consumer.phase(), ClassificationPhase::Complete);
    }

    #[test]
    fn complete_parses_buffer_when_service_gives_no_structure() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk(
            r#"{"risk_score":0.3,"risk_level":"low","recommended_action":"close"}"#,
        ));

        let outcome = consumer
            .process_event(event(StreamEventKind::ClassificationComplete {
                classification: None,
                raw_response: None,
            }))
            .expect("terminal outcome");

        match outcome {
            ClassificationOutcome::Complete(result) => {
                let structured = result.structured.expect("parsed from buffer");
                assert_eq!(structured.recommended_action, "close");
                assert!(!result.unstructured);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn complete_falls_back_to_raw_text() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("not json at all"));

        let outcome = consumer
            .process_event(event(StreamEventKind::ClassificationComplete {
                classification: None,
                raw_response: None,
            }))
            .expect("terminal outcome");

        match outcome {
            ClassificationOutcome::Complete(result) => {
                assert!(result.structured.is_none());
                assert!(result.unstructured);
                assert_eq!(result.raw_ai_response, "not json at all");
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn error_event_preserves_progress_metadata() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("partial"));

        let outcome = consumer
            .process_event(event(StreamEventKind::Error {
                message: "model unavailable".to_string(),
            }))
            .expect("terminal outcome");

        match outcome {
            ClassificationOutcome::Failed {
                message,
                chunk_count,
                ..
            } => {
                assert_eq!(message, "model unavailable");
                assert_eq!(chunk_count, 1);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(consumer.phase(), ClassificationPhase::Error);
    }

    #[test]
    fn terminal_fires_at_most_once() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));

        let first = consumer.process_event(event(StreamEventKind::ClassificationComplete {
            classification: None,
            raw_response: None,
        }));
        assert!(first.is_some());

        // Duplicate terminals and trailing chunks are ignored.
        let dup_error = consumer.process_event(event(StreamEventKind::Error {
            message: "late".to_string(),
        }));
        assert!(dup_error.is_none());
        let dup_complete = consumer.process_event(event(StreamEventKind::ClassificationComplete {
            classification: None,
            raw_response: None,
        }));
        assert!(dup_complete.is_none());
        assert!(consumer.process_event(chunk("late")).is_none());
        assert_eq!(consumer.phase(), ClassificationPhase::Complete);
    }

    #[test]
    fn deliberate_cancel_during_streaming_resets_without_failure() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("partial"));
        assert_eq!(consumer.phase(), ClassificationPhase::LlmStreaming);

        let outcome = consumer.cancel(AbortReason::UserRequested);
        assert!(outcome.is_none());
        assert_eq!(consumer.phase(), ClassificationPhase::Starting);
        assert!(!consumer.is_active());
        assert_eq!(consumer.chunk_count(), 0);
    }

    #[test]
    fn failure_cancel_produces_failed_outcome_once() {
        let mut consumer = attached_consumer();
        consumer.process_event(event(StreamEventKind::LlmStart));
        consumer.process_event(chunk("partial"));

        let outcome = consumer.cancel(AbortReason::Failure);
        assert!(matches!(
            outcome,
            Some(ClassificationOutcome::Failed { chunk_count: 1, .. })
        ));
        assert_eq!(consumer.phase(), ClassificationPhase::Error);

        // Second cancel is harmless.
        assert!(consumer.cancel(AbortReason::Failure).is_none());
    }

    #[test]
    fn attach_is_single_flight() {
        let (tx1, rx1) = channel(8);
        let (_tx2, rx2) = channel(8);

        let mut consumer = StreamingClassificationConsumer::new();
        consumer.attach(rx1);
        consumer.attach(rx2);
        assert!(consumer.is_active());

        // The first channel is still the attached one: its sender is live.
        assert!(!tx1.is_cancelled());
    }

    #[tokio::test]
    async fn run_drives_to_completion() {
        let (tx, rx) = channel(16);
        let mut consumer = StreamingClassificationConsumer::new();
        consumer.attach(rx);

        tokio::spawn(async move {
            tx.emit(StreamEventKind::PromptReady {
                prompt: "p".to_string(),
                model: "m".to_string(),
            })
            .await;
            tx.emit(StreamEventKind::LlmStart).await;
            for text in ["one ", "two"] {
                tx.emit(StreamEventKind::LlmChunk {
                    chunk: text.to_string(),
                })
                .await;
            }
            tx.emit(StreamEventKind::ProcessingStart).await;
            tx.emit(StreamEventKind::ClassificationComplete {
                classification: None,
                raw_response: None,
            })
            .await;
        });

        match consumer.run().await {
            ClassificationOutcome::Complete(result) => {
                assert_eq!(result.raw_ai_response, "one two");
                assert_eq!(result.chunk_count, 2);
                assert_eq!(result.model.as_deref(), Some("m"));
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert!(!consumer.is_active());
    }

    #[tokio::test]
    async fn run_maps_external_abort_to_cancelled() {
        let (tx, rx) = channel(16);
        let mut consumer = StreamingClassificationConsumer::new();
        consumer.attach(rx);
        let handle = consumer.abort_handle().expect("channel attached");

        tokio::spawn(async move {
            tx.emit(StreamEventKind::LlmStart).await;
            tx.emit(StreamEventKind::LlmChunk {
                chunk: "partial".to_string(),
            })
            .await;
            // Park until aborted, as a real in-flight call would.
            tx.cancelled().await;
        });

        let abort = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.abort(AbortReason::UserRequested);
        });

        let outcome = consumer.run().await;
        abort.await.unwrap();

        assert!(matches!(
            outcome,
            ClassificationOutcome::Cancelled {
                reason: AbortReason::UserRequested
            }
        ));
        assert_eq!(consumer.phase(), ClassificationPhase::Starting);
    }

    #[tokio::test]
    async fn run_maps_plain_close_to_failure() {
        let (tx, rx) = channel(8);
        let mut consumer = StreamingClassificationConsumer::new();
        consumer.attach(rx);

        tokio::spawn(async move {
            tx.emit(StreamEventKind::LlmStart).await;
            // Dropped without a terminal event.
        });

        match consumer.run().await {
            ClassificationOutcome::Failed { message, .. } => {
                assert!(message.contains("closed before completion"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(consumer.phase(), ClassificationPhase::Error);
    }
}
