//! Key-value persistence seam.

use crate::error::Result;

/// Synchronous key-value persistence, scoped per device/profile.
///
/// Implementations may back this with a file, an embedded database, or
/// an in-memory map; callers treat it as fast and local. Errors here are
/// real (I/O, corruption); fail-soft degradation is the responsibility
/// of the [`crate::history::HistoryStore`] layer, not the store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Builders for the engine's key scheme.
pub mod keys {
    use chrono::NaiveDate;

    /// Per-user scenario fingerprint history.
    pub fn scenario_history(user_key: &str) -> String {
        format!("ap:history:{}", user_key)
    }

    /// Per-user prefetched scenario queue cache.
    pub fn scenario_queue(user_key: &str) -> String {
        format!("ap:queue:{}", user_key)
    }

    /// Daily question cache for one local calendar day.
    pub fn daily_cache(date: NaiveDate) -> String {
        format!("qotd_{}", date.format("%Y-%m-%d"))
    }

    /// Append-only daily question history log.
    pub const QOTD_HISTORY: &str = "qotd_history";

    /// Tags already surfaced this ISO week.
    pub fn week_tags(week_key: &str) -> String {
        format!("qotd_week_tags_{}", week_key)
    }

}
