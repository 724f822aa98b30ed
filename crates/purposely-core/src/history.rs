//! Fail-soft history bookkeeping over the key-value seam.
//!
//! The underlying store may be unavailable or hold corrupted JSON. Reads
//! here always recover to an empty value and writes are best-effort;
//! nothing in this module blocks or fails the generation path. Degraded
//! operations are logged at `warn` and otherwise invisible.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

use crate::config::EngineConfig;
use crate::model::{QotdHistoryEntry, QotdItem, Scenario};
use crate::storage::{KeyValueStore, keys};

/// Per-user content history, the only entity with cross-call lifetime.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    scenario_cap: usize,
    retention_days: i64,
    week_tag_cap: usize,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            scenario_cap: config.scenario_history_cap,
            retention_days: config.retention_days,
            week_tag_cap: config.week_tag_cap,
        }
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, %err, "history read degraded to empty");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "corrupted history entry, treating as empty");
                T::default()
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, %err, "failed to serialize history entry, skipping write");
                return;
            }
        };
        if let Err(err) = self.store.set(key, &raw) {
            warn!(key, %err, "best-effort history write failed");
        }
    }

    // ------------------------------------------------------------------
    // Scenario side (per-user, Q+A fingerprints)
    // ------------------------------------------------------------------

    /// Retained scenario fingerprints for this user, oldest first.
    pub fn scenario_hashes(&self, user_key: &str) -> Vec<String> {
        self.read_json(&keys::scenario_history(user_key))
    }

    pub fn is_duplicate(&self, user_key: &str, hash: &str) -> bool {
        self.scenario_hashes(user_key).iter().any(|h| h == hash)
    }

    /// Appends newly served fingerprints, keeping the most recent
    /// `scenario_history_cap`.
    pub fn record_scenario_hashes(&self, user_key: &str, new_hashes: &[String]) {
        if new_hashes.is_empty() {
            return;
        }
        let mut hashes = self.scenario_hashes(user_key);
        hashes.extend(new_hashes.iter().cloned());
        if hashes.len() > self.scenario_cap {
            hashes.drain(..hashes.len() - self.scenario_cap);
        }
        self.write_json(&keys::scenario_history(user_key), &hashes);
    }

    /// Cached prefetch queue for this user, empty when absent.
    pub fn cached_queue(&self, user_key: &str) -> Vec<Scenario> {
        self.read_json(&keys::scenario_queue(user_key))
    }

    pub fn store_queue(&self, user_key: &str, queue: &[Scenario]) {
        self.write_json(&keys::scenario_queue(user_key), &queue);
    }

    // ------------------------------------------------------------------
    // Daily-question side (device-wide, Q-only fingerprints)
    // ------------------------------------------------------------------

    /// The retained daily-question history log.
    pub fn qotd_entries(&self) -> Vec<QotdHistoryEntry> {
        self.read_json(keys::QOTD_HISTORY)
    }

    /// Appends a selection, pruning entries older than the retention
    /// window so the log never grows unbounded.
    pub fn record_qotd_entry(&self, entry: QotdHistoryEntry, now: DateTime<Utc>) {
        let cutoff = now - Duration::days(self.retention_days);
        let mut entries: Vec<QotdHistoryEntry> = self
            .qotd_entries()
            .into_iter()
            .filter(|e| e.date >= cutoff)
            .collect();
        entries.push(entry);
        self.write_json(keys::QOTD_HISTORY, &entries);
    }

    pub fn cached_daily(&self, date: NaiveDate) -> Option<QotdItem> {
        self.read_json(&keys::daily_cache(date))
    }

    pub fn store_daily(&self, date: NaiveDate, item: &QotdItem) {
        self.write_json(&keys::daily_cache(date), item);
    }

    /// Tags already surfaced in the given ISO week.
    pub fn week_tags(&self, week_key: &str) -> Vec<String> {
        self.read_json(&keys::week_tags(week_key))
    }

    /// Merges newly surfaced tags into the weekly set, capped at the
    /// most recent `week_tag_cap`.
    pub fn record_week_tags(&self, week_key: &str, tags: &[String]) {
        if tags.is_empty() {
            return;
        }
        let mut used = self.week_tags(week_key);
        for tag in tags {
            if !used.contains(tag) {
                used.push(tag.clone());
            }
        }
        if used.len() > self.week_tag_cap {
            used.drain(..used.len() - self.week_tag_cap);
        }
        self.write_json(&keys::week_tags(week_key), &used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PurposelyError, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapStore {
        map: Mutex<HashMap<String, String>>,
    }

    impl MapStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                map: Mutex::new(HashMap::new()),
            })
        }

        fn put(&self, key: &str, value: &str) {
            self.map.lock().unwrap().insert(key.into(), value.into());
        }
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.map.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.map.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
    }

    /// Storage that always fails, as in private browsing mode.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PurposelyError::storage("unavailable"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PurposelyError::storage("unavailable"))
        }
    }

    fn history(store: Arc<dyn KeyValueStore>) -> HistoryStore {
        HistoryStore::new(store, &EngineConfig::default())
    }

    #[test]
    fn test_roundtrip_scenario_hashes() {
        let store = history(MapStore::new());
        assert!(store.scenario_hashes("u1").is_empty());

        store.record_scenario_hashes("u1", &["h1".into(), "h2".into()]);
        assert_eq!(store.scenario_hashes("u1"), vec!["h1", "h2"]);
        assert!(store.is_duplicate("u1", "h1"));
        assert!(!store.is_duplicate("u1", "h3"));
        assert!(!store.is_duplicate("u2", "h1"));
    }

    #[test]
    fn test_scenario_history_capped_at_most_recent() {
        let mut config = EngineConfig::default();
        config.scenario_history_cap = 3;
        let store = HistoryStore::new(MapStore::new(), &config);

        store.record_scenario_hashes("u1", &["a".into(), "b".into()]);
        store.record_scenario_hashes("u1", &["c".into(), "d".into()]);
        assert_eq!(store.scenario_hashes("u1"), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_broken_store_fails_soft() {
        let store = history(Arc::new(BrokenStore));
        assert!(store.scenario_hashes("u1").is_empty());
        assert!(!store.is_duplicate("u1", "h1"));
        assert!(store.qotd_entries().is_empty());
        assert!(store.cached_daily(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()).is_none());
        // Writes must not panic or propagate.
        store.record_scenario_hashes("u1", &["h1".into()]);
        store.record_week_tags("2026-W36", &["trust".into()]);
    }

    #[test]
    fn test_corrupted_json_treated_as_empty() {
        let raw = MapStore::new();
        raw.put("ap:history:u1", "{not json");
        raw.put("qotd_history", "[{\"broken\":");
        let store = history(raw);
        assert!(store.scenario_hashes("u1").is_empty());
        assert!(store.qotd_entries().is_empty());
    }

    #[test]
    fn test_qotd_retention_prune() {
        let store = history(MapStore::new());
        let now = Utc::now();

        store.record_qotd_entry(
            QotdHistoryEntry {
                date: now - Duration::days(200),
                hash: "old".into(),
                tags: vec![],
            },
            now - Duration::days(200),
        );
        store.record_qotd_entry(
            QotdHistoryEntry {
                date: now - Duration::days(10),
                hash: "recent".into(),
                tags: vec![],
            },
            now - Duration::days(10),
        );
        store.record_qotd_entry(
            QotdHistoryEntry {
                date: now,
                hash: "new".into(),
                tags: vec![],
            },
            now,
        );

        let hashes: Vec<_> = store.qotd_entries().into_iter().map(|e| e.hash).collect();
        assert_eq!(hashes, vec!["recent", "new"]);
    }

    #[test]
    fn test_week_tags_dedupe_and_cap() {
        let mut config = EngineConfig::default();
        config.week_tag_cap = 3;
        let store = HistoryStore::new(MapStore::new(), &config);

        store.record_week_tags("2026-W36", &["trust".into(), "money".into()]);
        store.record_week_tags("2026-W36", &["trust".into(), "family".into(), "intimacy".into()]);

        // "trust" is not re-added; cap keeps the most recent three.
        assert_eq!(store.week_tags("2026-W36"), vec!["money", "family", "intimacy"]);
    }

    #[test]
    fn test_daily_cache_roundtrip() {
        let store = history(MapStore::new());
        let date = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert!(store.cached_daily(date).is_none());

        let item = QotdItem {
            question: "What does being fully supported by a partner actually look like for you in daily life?".to_string(),
            angle: "surfaces support expectations".to_string(),
            tags: vec!["communication".into()],
            follow_ups: None,
            depth_score: 6,
        };
        store.store_daily(date, &item);
        assert_eq!(store.cached_daily(date).unwrap(), item);
    }
}
