//! Domain models for generated content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fingerprint::scenario_fingerprint;
use crate::parse::RawRecord;
use crate::tags::detect_tags;

/// A generated conversation item: a dilemma and a coached perspective.
///
/// Created transiently per generation call and never mutated afterwards;
/// either discarded as a duplicate or handed to the caller. Only the
/// `hash` (plus tags and timestamps) ever reaches durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Opaque unique identifier, generated client-side.
    pub id: String,
    /// The dilemma/prompt shown to the user.
    pub question: String,
    /// The generated response/advice.
    pub perspective: String,
    /// Topical labels derived from content, in detection order.
    pub tags: Vec<String>,
    /// Local creation time (not server-authoritative).
    pub created_at: DateTime<Utc>,
    /// Dedup key over normalized question + perspective.
    pub hash: String,
}

impl Scenario {
    /// Builds a scenario from a parsed upstream record.
    ///
    /// Returns `None` when question or perspective trim to empty; such
    /// records are discarded rather than surfaced as errors.
    pub fn from_record(record: RawRecord, now: DateTime<Utc>) -> Option<Self> {
        let question = record.question.trim().to_string();
        let perspective = record.answer.trim().to_string();
        if question.is_empty() || perspective.is_empty() {
            return None;
        }

        let hash = scenario_fingerprint(&question, &perspective);
        let tags = detect_tags(&question, &perspective);

        Some(Self {
            id: Uuid::new_v4().to_string(),
            question,
            perspective,
            tags,
            created_at: now,
            hash,
        })
    }
}

/// A candidate daily question as emitted by the generation collaborator.
///
/// Field names follow the model output contract (snake_case), unlike the
/// client-facing `Scenario`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QotdItem {
    pub question: String,
    /// Rationale for why this question is worth asking.
    #[serde(default)]
    pub angle: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_ups: Option<Vec<String>>,
    /// Integer quality/intensity rating assigned by the model.
    #[serde(default)]
    pub depth_score: i32,
}

/// One line of the daily-question history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QotdHistoryEntry {
    /// Selection timestamp.
    pub date: DateTime<Utc>,
    /// Fingerprint of the question text alone.
    pub hash: String,
    /// Tags carried at selection time, for weekly rotation bookkeeping.
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_trims_and_fingerprints() {
        let record = RawRecord {
            question: "  Should I split the bill on a first date?  ".to_string(),
            answer: " Talk about money expectations early. ".to_string(),
        };
        let scenario = Scenario::from_record(record, Utc::now()).unwrap();

        assert_eq!(scenario.question, "Should I split the bill on a first date?");
        assert_eq!(scenario.perspective, "Talk about money expectations early.");
        assert!(!scenario.id.is_empty());
        assert_eq!(scenario.hash.len(), 64);
        assert!(scenario.tags.contains(&"money".to_string()));
    }

    #[test]
    fn test_from_record_rejects_blank_fields() {
        let blank_question = RawRecord {
            question: "   ".to_string(),
            answer: "An answer".to_string(),
        };
        assert!(Scenario::from_record(blank_question, Utc::now()).is_none());

        let blank_answer = RawRecord {
            question: "A question".to_string(),
            answer: "".to_string(),
        };
        assert!(Scenario::from_record(blank_answer, Utc::now()).is_none());
    }

    #[test]
    fn test_qotd_item_defaults_for_optional_fields() {
        let item: QotdItem =
            serde_json::from_str(r#"{"question":"How do you rebuild trust?"}"#).unwrap();
        assert_eq!(item.angle, "");
        assert!(item.tags.is_empty());
        assert!(item.follow_ups.is_none());
        assert_eq!(item.depth_score, 0);
    }
}
