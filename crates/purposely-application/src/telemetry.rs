//! Structured telemetry for generation operations.
//!
//! Events are forwarded over an unbounded channel so consumers (an
//! analytics bridge, a test harness) can observe them without ever
//! blocking the generation path. A closed or missing receiver is not an
//! error; emission silently drops.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Lifecycle phase of a generation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryKind {
    Start,
    Success,
    /// Success, but only after the single retry.
    SuccessRetry,
    Fail,
}

/// One telemetry event.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub kind: TelemetryKind,
    /// Operation name ("generate_one", "prefetch", "daily_question").
    pub operation: &'static str,
    /// Elapsed time since the operation started, in milliseconds.
    pub elapsed_ms: u64,
    /// Result count where meaningful (batch sizes), otherwise 0.
    pub count: usize,
    /// Failure reason code for `Fail` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: String,
}

/// Non-blocking event sink, fully disable-able.
#[derive(Clone)]
pub struct TelemetrySink {
    sender: Option<mpsc::UnboundedSender<TelemetryEvent>>,
}

impl TelemetrySink {
    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// A sink paired with a receiver for the emitted events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TelemetryEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Emits an event. Never blocks, never fails.
    pub fn emit(
        &self,
        kind: TelemetryKind,
        operation: &'static str,
        elapsed: Duration,
        count: usize,
        reason: Option<String>,
    ) {
        let Some(sender) = &self.sender else {
            return;
        };

        let event = TelemetryEvent {
            kind,
            operation,
            elapsed_ms: elapsed.as_millis() as u64,
            count,
            reason,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        debug!(
            kind = ?event.kind,
            operation = event.operation,
            elapsed_ms = event.elapsed_ms,
            "telemetry"
        );
        // Non-blocking send - if the receiver is dropped, we just skip.
        let _ = sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers_events() {
        let (sink, mut receiver) = TelemetrySink::channel();
        sink.emit(TelemetryKind::Start, "generate_one", Duration::ZERO, 0, None);
        sink.emit(
            TelemetryKind::Fail,
            "generate_one",
            Duration::from_millis(42),
            0,
            Some("timeout".to_string()),
        );

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.kind, TelemetryKind::Start);
        let second = receiver.recv().await.unwrap();
        assert_eq!(second.kind, TelemetryKind::Fail);
        assert_eq!(second.reason.as_deref(), Some("timeout"));
        assert_eq!(second.elapsed_ms, 42);
    }

    #[test]
    fn test_disabled_sink_never_fails() {
        let sink = TelemetrySink::disabled();
        assert!(!sink.is_enabled());
        sink.emit(TelemetryKind::Success, "prefetch", Duration::ZERO, 6, None);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_harmless() {
        let (sink, receiver) = TelemetrySink::channel();
        drop(receiver);
        sink.emit(TelemetryKind::Start, "daily_question", Duration::ZERO, 0, None);
    }
}
