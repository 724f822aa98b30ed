//! Tolerant extraction of structured records from raw generator output.
//!
//! Models wrap JSON in markdown fences, prose preambles, or trailing
//! commentary. The strategy here is strict parse first, then fenced code
//! blocks, then the first balanced `[...]`/`{...}` substring. Nothing in
//! this module is an error for the caller: unusable payloads come back as
//! empty results.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::QotdItem;

/// A `{question, answer}` pair as extracted from generator output,
/// before any domain validation.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub question: String,
    pub answer: String,
}

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[a-zA-Z0-9_-]+)?\s*(.*?)```").unwrap());

/// Extracts the first parseable JSON value from free-form text.
pub fn extract_json(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        debug!("parsed entire payload as JSON");
        return Some(value);
    }

    for captures in CODE_FENCE.captures_iter(raw) {
        if let Some(body) = captures.get(1) {
            if let Ok(value) = serde_json::from_str::<Value>(body.as_str().trim()) {
                debug!("extracted JSON from markdown code fence");
                return Some(value);
            }
        }
    }

    if let Some(candidate) = find_balanced(raw, '[', ']') {
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            debug!("extracted JSON array substring");
            return Some(value);
        }
    }

    if let Some(candidate) = find_balanced(raw, '{', '}') {
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            debug!("extracted JSON object substring");
            return Some(value);
        }
    }

    warn!("no usable JSON structure found in generator payload");
    None
}

/// First balanced delimiter span in the text, no repair beyond that.
fn find_balanced(text: &str, open: char, close: char) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in text.char_indices() {
        if ch == open {
            if depth == 0 {
                start = Some(i);
            }
            depth += 1;
        } else if ch == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                let begin = start?;
                return Some(text[begin..i + ch.len_utf8()].to_string());
            }
        }
    }
    None
}

/// Coerces loosely-typed JSON into text: strings pass through, scalars
/// are stringified, everything else becomes empty.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Normalizes any of the legacy record shapes into a `RawRecord`.
///
/// Accepts `question`/`prompt`/`q` and `answer`/`perspective`/
/// `response`/`a` as field names; returns `None` when either side is
/// absent or coerces to empty.
fn coerce_record(value: &Value) -> Option<RawRecord> {
    let object = value.as_object()?;

    let question = ["question", "prompt", "q"]
        .iter()
        .find_map(|key| object.get(*key))
        .map(coerce_text)
        .unwrap_or_default();
    let answer = ["answer", "perspective", "response", "a"]
        .iter()
        .find_map(|key| object.get(*key))
        .map(coerce_text)
        .unwrap_or_default();

    if question.trim().is_empty() || answer.trim().is_empty() {
        return None;
    }

    Some(RawRecord { question, answer })
}

/// Bulk mode: extracts every usable record from the payload.
pub fn parse_records(raw: &str) -> Vec<RawRecord> {
    match extract_json(raw) {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_record).collect(),
        Some(value) => coerce_record(&value).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Single mode: extracts one record, taking the first of an array if the
/// model returned a batch anyway.
pub fn parse_single(raw: &str) -> Option<RawRecord> {
    match extract_json(raw)? {
        Value::Array(items) => items.iter().find_map(coerce_record),
        value => coerce_record(&value),
    }
}

/// Extracts daily-question candidates. Items without a question are
/// dropped; unknown fields are ignored; malformed items are skipped
/// rather than failing the batch.
pub fn parse_qotd_items(raw: &str) -> Vec<QotdItem> {
    let items = match extract_json(raw) {
        Some(Value::Array(items)) => items,
        Some(value) => vec![value],
        None => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|value| serde_json::from_value::<QotdItem>(value).ok())
        .filter(|item| !item.question.trim().is_empty())
        .collect()
}
