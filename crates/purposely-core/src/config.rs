//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for generation, dedup, and retention.
///
/// All fields default so a missing or partial config file degrades to
/// the shipped behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Budget for each upstream generation call, in milliseconds.
    pub timeout_ms: u64,
    /// Minimum batch size requested by `prefetch`.
    pub min_batch: usize,
    /// Candidate count requested by the daily-question pipeline.
    pub qotd_batch: usize,
    /// Most-recent fingerprints retained per user for scenario dedup.
    pub scenario_history_cap: usize,
    /// Age window for daily-question history entries, in days.
    pub retention_days: i64,
    /// Most-recent tags retained per ISO week.
    pub week_tag_cap: usize,
    /// Master switch for telemetry emission.
    pub telemetry_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 12_000,
            min_batch: 6,
            qotd_batch: 14,
            scenario_history_cap: 50,
            retention_days: 120,
            week_tag_cap: 10,
            telemetry_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
