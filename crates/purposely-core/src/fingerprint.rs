//! Deterministic content fingerprints used as dedup keys.
//!
//! Fingerprints are uniqueness keys, not security primitives: two items
//! with identical case/whitespace-normalized text always collide, and
//! semantically-similar-but-textually-different content never does.

use sha2::{Digest, Sha256};

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// SHA-256 hex digest of the normalized (lowercased, trimmed) input.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of a scenario, combining question and perspective.
///
/// This is the dedup key for generated scenarios. The daily-question
/// pipeline deliberately uses [`question_fingerprint`] instead; the two
/// features dedup at different granularity.
pub fn scenario_fingerprint(question: &str, perspective: &str) -> String {
    fingerprint(&format!("{}\n{}", normalize(question), normalize(perspective)))
}

/// Fingerprint of the question text alone.
pub fn question_fingerprint(question: &str) -> String {
    fingerprint(question)
}
