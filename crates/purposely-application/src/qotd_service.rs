//! Daily question selection.
//!
//! One question per local calendar day, cached by date string. The
//! pipeline never fails the caller: any upstream or parse problem falls
//! back to the built-in seed set, and the seed set itself is the
//! terminal fallback when every candidate collides with history.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use purposely_core::config::EngineConfig;
use purposely_core::error::Result;
use purposely_core::fingerprint::question_fingerprint;
use purposely_core::history::HistoryStore;
use purposely_core::model::{QotdHistoryEntry, QotdItem};
use purposely_core::parse::parse_qotd_items;
use purposely_core::storage::KeyValueStore;
use purposely_core::time::{Clock, week_key};
use purposely_core::validate::validate_items;
use purposely_interaction::{GenerationMode, ProfileContext, TextGenerator, prompts};

use crate::seeds;
use crate::telemetry::{TelemetryKind, TelemetrySink};

/// Device-wide daily question picker.
pub struct DailyQuestionService {
    generator: Arc<dyn TextGenerator>,
    history: HistoryStore,
    clock: Arc<dyn Clock>,
    context: ProfileContext,
    config: EngineConfig,
    telemetry: TelemetrySink,
}

impl DailyQuestionService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        context: ProfileContext,
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
            generator,
            history,
            clock,
            context,
            config,
            telemetry,
        }
    }

    /// Returns today's question, generating and caching it on the first
    /// call of the day. Always resolves.
    pub async fn daily_question(&self) -> QotdItem {
        let today = self.clock.today();
        if let Some(cached) = self.history.cached_daily(today) {
            debug!(%today, "serving cached daily question");
            return cached;
        }

        let started = Instant::now();
        self.telemetry.emit(TelemetryKind::Start, "daily_question", Duration::ZERO, 0, None);

        let pick = self.pick_new(today).await;
        self.record_selection(today, &pick);

        self.telemetry.emit(
            TelemetryKind::Success,
            "daily_question",
            started.elapsed(),
            1,
            None,
        );
        pick
    }

    /// Generation + selection for a fresh day.
    async fn pick_new(&self, today: chrono::NaiveDate) -> QotdItem {
        let candidates = match self.fetch_candidates().await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(reason = err.reason(), "daily generation failed, using seed set");
                seeds::all()
            }
        };

        let valid = validate_items(candidates);
        let valid = if valid.is_empty() {
            debug!("no candidate survived validation, using seed set");
            seeds::all()
        } else {
            valid
        };

        // Dedup by question fingerprint against the retained history.
        let served: HashSet<String> = self
            .history
            .qotd_entries()
            .into_iter()
            .map(|entry| entry.hash)
            .collect();
        let unique: Vec<QotdItem> = valid
            .into_iter()
            .filter(|item| !served.contains(&question_fingerprint(&item.question)))
            .collect();

        // Prefer a candidate introducing a tag unused this ISO week;
        // this is a soft bias, not a guarantee.
        let used_tags = self.history.week_tags(&week_key(today));
        unique
            .iter()
            .find(|item| item.tags.iter().any(|tag| !used_tags.contains(tag)))
            .cloned()
            .or_else(|| unique.first().cloned())
            .unwrap_or_else(seeds::first)
    }

    async fn fetch_candidates(&self) -> Result<Vec<QotdItem>> {
        let prompt = prompts::daily_batch_prompt(self.config.qotd_batch, &self.context);
        let raw = tokio::time::timeout(
            self.config.timeout(),
            self.generator
                .generate(&prompt, &self.context, GenerationMode::DailyBatch),
        )
        .await
        .map_err(|_| purposely_core::PurposelyError::Timeout {
            elapsed_ms: self.config.timeout_ms,
        })??;

        Ok(parse_qotd_items(&raw))
    }

    fn record_selection(&self, today: chrono::NaiveDate, pick: &QotdItem) {
        let now = self.clock.now();
        self.history.record_qotd_entry(
            QotdHistoryEntry {
                date: now,
                hash: question_fingerprint(&pick.question),
                tags: pick.tags.clone(),
            },
            now,
        );
        self.history.store_daily(today, pick);
        self.history.record_week_tags(&week_key(today), &pick.tags);
    }
}
