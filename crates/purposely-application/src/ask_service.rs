//! Scenario generation orchestration.
//!
//! `AskPurposelyService` owns the generation lifecycle: prompting the
//! collaborator, parsing and mapping candidates, dedup against history,
//! the 12-second upstream budget, the single retry of `generate_one`,
//! cooperative cancellation, and telemetry. At most one upstream call is
//! outstanding per instance; overlapping `generate_one` calls coalesce
//! onto the same in-flight future.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use purposely_core::config::EngineConfig;
use purposely_core::error::{PurposelyError, Result};
use purposely_core::history::HistoryStore;
use purposely_core::model::Scenario;
use purposely_core::parse::{parse_records, parse_single};
use purposely_core::storage::KeyValueStore;
use purposely_core::time::Clock;
use purposely_interaction::{GenerationMode, ProfileContext, TextGenerator, prompts};

use crate::telemetry::{TelemetryKind, TelemetrySink};

/// Observable lifecycle of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    Generating,
    Success,
    Failed,
}

type SharedGeneration = Shared<BoxFuture<'static, Result<Scenario>>>;

/// Per-user scenario generation service.
pub struct AskPurposelyService {
    inner: Arc<ServiceInner>,
    /// The coalescing slot for `generate_one`.
    in_flight: Mutex<Option<SharedGeneration>>,
}

struct ServiceInner {
    generator: Arc<dyn TextGenerator>,
    history: HistoryStore,
    clock: Arc<dyn Clock>,
    context: ProfileContext,
    user_key: String,
    config: EngineConfig,
    telemetry: TelemetrySink,
    /// Root cancellation token; each operation runs on a child of it,
    /// so overlapping operations all stay cancellable.
    cancel: StdMutex<CancellationToken>,
    state: StdMutex<ServiceState>,
    /// Serializes upstream calls across `generate_one` and `prefetch`.
    upstream_gate: Mutex<()>,
}

impl AskPurposelyService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        context: ProfileContext,
        user_key: impl Into<String>,
        config: EngineConfig,
        telemetry: TelemetrySink,
    ) -> Self {
        let telemetry = if config.telemetry_enabled {
            telemetry
        } else {
            TelemetrySink::disabled()
        };
        let history = HistoryStore::new(store, &config);

        Self {
            inner: Arc::new(ServiceInner {
                generator,
                history,
                clock,
                context,
                user_key: user_key.into(),
                config,
                telemetry,
                cancel: StdMutex::new(CancellationToken::new()),
                state: StdMutex::new(ServiceState::Idle),
                upstream_gate: Mutex::new(()),
            }),
            in_flight: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceState {
        *self.inner.state.lock().unwrap()
    }

    /// The last persisted prefetch queue for this user (fail-soft).
    pub fn queued(&self) -> Vec<Scenario> {
        self.inner.history.cached_queue(&self.inner.user_key)
    }

    /// Requests cooperative cancellation of every operation in flight.
    ///
    /// The flag is checked after every upstream await: an upstream call
    /// that already completed has its result discarded and the operation
    /// fails with `Aborted`. Operations started after this call run on a
    /// fresh token and are unaffected. An HTTP call already on the wire
    /// is not interrupted.
    pub fn cancel(&self) {
        let mut guard = self.inner.cancel.lock().unwrap();
        guard.cancel();
        *guard = CancellationToken::new();
    }

    /// Generates one scenario for a user-submitted question.
    ///
    /// Retries exactly once on timeout, bad response, or duplicate.
    /// Overlapping calls while a generation is pending return the same
    /// in-flight future; exactly one upstream request cycle runs.
    pub async fn generate_one(&self, user_question: &str) -> Result<Scenario> {
        let shared = {
            let mut guard = self.in_flight.lock().await;
            match guard.as_ref() {
                // Still pending: coalesce onto it.
                Some(existing) if existing.peek().is_none() => existing.clone(),
                _ => {
                    let fut: SharedGeneration = self
                        .inner
                        .clone()
                        .generate_one_inner(user_question.to_string())
                        .boxed()
                        .shared();
                    *guard = Some(fut.clone());
                    fut
                }
            }
        };
        shared.await
    }

    /// Pre-loads up to `n` unique scenarios with a single batch request.
    ///
    /// The upstream batch size is at least `min_batch` (6). No automatic
    /// retry: batch failures surface to the caller. Returning fewer than
    /// `n` (even zero, when everything collided with history) is not an
    /// error.
    pub async fn prefetch(&self, n: usize) -> Result<Vec<Scenario>> {
        let inner = &self.inner;
        let token = inner.begin_operation();
        let started = Instant::now();
        inner.telemetry.emit(TelemetryKind::Start, "prefetch", Duration::ZERO, n, None);

        let result = inner.prefetch_inner(n, &token).await;
        match &result {
            Ok(scenarios) => {
                inner.set_state(ServiceState::Success);
                inner.telemetry.emit(
                    TelemetryKind::Success,
                    "prefetch",
                    started.elapsed(),
                    scenarios.len(),
                    None,
                );
            }
            Err(err) => {
                inner.set_state(ServiceState::Failed);
                inner.telemetry.emit(
                    TelemetryKind::Fail,
                    "prefetch",
                    started.elapsed(),
                    0,
                    Some(err.reason().to_string()),
                );
            }
        }
        result
    }
}

impl ServiceInner {
    /// Starts a fresh operation: Generating state plus a child of the
    /// root token, so a later operation never detaches an earlier one
    /// from `cancel()`.
    fn begin_operation(&self) -> CancellationToken {
        self.set_state(ServiceState::Generating);
        self.cancel.lock().unwrap().child_token()
    }

    fn set_state(&self, state: ServiceState) {
        *self.state.lock().unwrap() = state;
    }

    /// One upstream call, raced against the timeout budget, with the
    /// abort flag checked after resumption.
    async fn call_upstream(
        &self,
        prompt: &str,
        mode: GenerationMode,
        token: &CancellationToken,
    ) -> Result<String> {
        let _permit = self.upstream_gate.lock().await;
        let started = Instant::now();

        let raw = match tokio::time::timeout(
            self.config.timeout(),
            self.generator.generate(prompt, &self.context, mode),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(PurposelyError::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }
        };

        if token.is_cancelled() {
            return Err(PurposelyError::Aborted);
        }
        Ok(raw)
    }

    /// One full `generate_one` attempt: prompt, parse, map, dedup.
    async fn attempt_one(&self, user_question: &str, token: &CancellationToken) -> Result<Scenario> {
        let prompt = prompts::scenario_single_prompt(user_question, &self.context);
        let raw = self
            .call_upstream(&prompt, GenerationMode::ScenarioSingle, token)
            .await?;

        let record = parse_single(&raw)
            .ok_or_else(|| PurposelyError::bad_response("no usable record in generator payload"))?;
        let scenario = Scenario::from_record(record, self.clock.now())
            .ok_or_else(|| PurposelyError::bad_response("record missing question or perspective"))?;

        if self.history.is_duplicate(&self.user_key, &scenario.hash) {
            return Err(PurposelyError::Duplicate);
        }
        Ok(scenario)
    }

    async fn generate_one_inner(self: Arc<Self>, user_question: String) -> Result<Scenario> {
        let token = self.begin_operation();
        let started = Instant::now();
        self.telemetry.emit(TelemetryKind::Start, "generate_one", Duration::ZERO, 0, None);

        let first = self.attempt_one(&user_question, &token).await;
        let (result, retried) = match first {
            Ok(scenario) => (Ok(scenario), false),
            Err(err) if err.is_retryable() => {
                debug!(reason = err.reason(), "first generation attempt failed, retrying once");
                (self.attempt_one(&user_question, &token).await, true)
            }
            Err(err) => (Err(err), false),
        };

        match result {
            Ok(scenario) => {
                self.history
                    .record_scenario_hashes(&self.user_key, std::slice::from_ref(&scenario.hash));
                self.set_state(ServiceState::Success);
                let kind = if retried {
                    TelemetryKind::SuccessRetry
                } else {
                    TelemetryKind::Success
                };
                self.telemetry.emit(kind, "generate_one", started.elapsed(), 1, None);
                Ok(scenario)
            }
            Err(err) => {
                self.set_state(ServiceState::Failed);
                self.telemetry.emit(
                    TelemetryKind::Fail,
                    "generate_one",
                    started.elapsed(),
                    0,
                    Some(err.reason().to_string()),
                );
                Err(err)
            }
        }
    }

    async fn prefetch_inner(&self, n: usize, token: &CancellationToken) -> Result<Vec<Scenario>> {
        let batch = self.config.min_batch.max(n);
        let prompt = prompts::scenario_batch_prompt(batch, &self.context);
        let raw = self
            .call_upstream(&prompt, GenerationMode::ScenarioBatch, token)
            .await?;

        let records = parse_records(&raw);
        if records.is_empty() {
            return Err(PurposelyError::bad_response(
                "no usable records in generator payload",
            ));
        }

        let now = self.clock.now();
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for record in records {
            let Some(scenario) = Scenario::from_record(record, now) else {
                continue;
            };
            if seen.contains(&scenario.hash)
                || self.history.is_duplicate(&self.user_key, &scenario.hash)
            {
                continue;
            }
            seen.insert(scenario.hash.clone());
            unique.push(scenario);
            if unique.len() == n {
                break;
            }
        }

        let hashes: Vec<String> = unique.iter().map(|s| s.hash.clone()).collect();
        self.history.record_scenario_hashes(&self.user_key, &hashes);
        self.history.store_queue(&self.user_key, &unique);
        Ok(unique)
    }
}
