//! Typed, ordered stream event channel
//!
//! One channel per classification call. Events arrive in strict temporal
//! order (single mpsc queue, never reordered or dropped); the receiving
//! side can be aborted through a cancellation token shared with cloneable
//! abort handles. Aborting twice is harmless; the first recorded reason
//! wins.

use crate::classify::{StreamEvent, StreamEventKind};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Why a stream was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Explicit user action
    UserRequested,
    /// Owner teardown (reset, shutdown)
    Teardown,
    /// A genuine failure elsewhere forced the abort
    Failure,
}

impl AbortReason {
    /// Deliberate aborts suppress the error path entirely
    #[inline]
    #[must_use]
    pub fn is_deliberate(&self) -> bool {
        matches!(self, AbortReason::UserRequested | AbortReason::Teardown)
    }
}

/// Create a connected sender/receiver pair for one classification call
#[must_use]
pub fn channel(capacity: usize) -> (StreamEventSender, StreamEventChannel) {
    let (tx, rx) = mpsc::channel(capacity);
    let cancel = CancellationToken::new();
    let reason = Arc::new(OnceLock::new());

    let sender = StreamEventSender {
        tx,
        cancel: cancel.clone(),
    };
    let receiver = StreamEventChannel {
        events: rx,
        cancel,
        reason,
    };
    (sender, receiver)
}

/// Producing side of a stream event channel
#[derive(Debug, Clone)]
pub struct StreamEventSender {
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
}

impl StreamEventSender {
    /// Emit one event, stamped with the current time
    ///
    /// Returns false when the receiver is gone or the stream was aborted.
    pub async fn emit(&self, kind: StreamEventKind) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(StreamEvent::new(kind)).await.is_ok()
    }

    /// True once the receiving side aborted the stream
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait until the receiving side aborts the stream
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

/// Receiving side of a stream event channel
#[derive(Debug)]
pub struct StreamEventChannel {
    events: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl StreamEventChannel {
    /// Receive the next event in arrival order
    ///
    /// Returns `None` when the producer closed the stream or the channel
    /// was aborted.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        tokio::select! {
            // Abort wins over buffered events so cancellation takes
            // effect at the next suspension point.
            biased;
            () = self.cancel.cancelled() => None,
            event = self.events.recv() => event,
        }
    }

    /// Abort the stream; idempotent, first reason wins
    pub fn abort(&self, reason: AbortReason) {
        let _ = self.reason.set(reason);
        self.cancel.cancel();
    }

    /// Cloneable handle that can abort from outside the receive loop
    #[must_use]
    pub fn abort_handle(&self) -> StreamAbortHandle {
        StreamAbortHandle {
            cancel: self.cancel.clone(),
            reason: Arc::clone(&self.reason),
        }
    }

    /// True once the stream was aborted
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Recorded abort reason, if any
    #[inline]
    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        self.reason.get().copied()
    }
}

/// Handle that aborts an open stream event channel
#[derive(Debug, Clone)]
pub struct StreamAbortHandle {
    cancel: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl StreamAbortHandle {
    /// Abort the stream; idempotent, first reason wins
    pub fn abort(&self, reason: AbortReason) {
        let _ = self.reason.set(reason);
        self.cancel.cancel();
    }

    /// True once the stream was aborted
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (tx, mut rx) = channel(8);

        for text in ["a", "b", "c"] {
            assert!(
                tx.emit(StreamEventKind::LlmChunk {
                    chunk: text.to_string(),
                })
                .await
            );
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(event) = rx.next_event().await {
            if let StreamEventKind::LlmChunk { chunk } = event.kind {
                seen.push(chunk);
            }
        }
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn abort_is_idempotent_and_first_reason_wins() {
        let (_tx, rx) = channel(8);
        let handle = rx.abort_handle();

        handle.abort(AbortReason::UserRequested);
        handle.abort(AbortReason::Failure);

        assert!(rx.is_aborted());
        assert_eq!(rx.abort_reason(), Some(AbortReason::UserRequested));
    }

    #[tokio::test]
    async fn next_event_returns_none_after_abort() {
        let (tx, mut rx) = channel(8);
        rx.abort(AbortReason::Teardown);

        assert!(rx.next_event().await.is_none());
        assert!(!tx.emit(StreamEventKind::LlmStart).await);
    }

    #[test]
    fn deliberate_reasons() {
        assert!(AbortReason::UserRequested.is_deliberate());
        assert!(AbortReason::Teardown.is_deliberate());
        assert!(!AbortReason::Failure.is_deliberate());
    }
}
