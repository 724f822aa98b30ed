//! Shared test fixtures: a scripted generation collaborator and
//! payload builders.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use purposely_core::error::{PurposelyError, Result};
use purposely_interaction::{GenerationMode, ProfileContext, TextGenerator};

/// Installs a test-writer tracing subscriber honoring `RUST_LOG`.
/// Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collaborator that replays a fixed script of responses and counts
/// upstream calls.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Adds an artificial latency before each scripted response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _context: &ProfileContext,
        _mode: GenerationMode,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PurposelyError::internal("script exhausted")))
    }
}

/// A well-formed single-scenario payload.
pub fn single_payload() -> String {
    serde_json::json!({
        "question": "Should I bring up exclusivity after two months of dating?",
        "answer": "Name what you want plainly and ask where they stand."
    })
    .to_string()
}

/// A well-formed batch payload of `n` distinct scenarios.
pub fn batch_payload(n: usize) -> String {
    let items: Vec<_> = (0..n)
        .map(|i| {
            serde_json::json!({
                "question": format!("Q{i} how should we handle this recurring dilemma together?"),
                "answer": format!("A{i} here is one grounded perspective to sit with."),
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}
