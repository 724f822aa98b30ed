//! Candidate validation for the daily-question pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::QotdItem;

/// Inclusive word-count window for a daily question.
pub const MIN_WORDS: usize = 14;
pub const MAX_WORDS: usize = 28;

/// Whole-word, case-insensitive denylist. Deliberately blunt: a daily
/// prompt in a coaching app has no business skirting the line.
const DENYLIST: &[&str] = &[
    "fuck", "fucking", "shit", "bitch", "asshole", "bastard", "dick", "cunt", "slut", "whore",
    "porn", "nude", "nudes",
];

static DENYLIST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = DENYLIST.join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
        .expect("denylist pattern is static and valid")
});

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_clean(text: &str) -> bool {
    !DENYLIST_PATTERN.is_match(text)
}

/// Whether a single candidate is eligible for selection.
pub fn is_valid_item(item: &QotdItem) -> bool {
    let words = word_count(&item.question);
    (MIN_WORDS..=MAX_WORDS).contains(&words) && is_clean(&item.question) && is_clean(&item.angle)
}

/// Drops invalid candidates; keeps list order.
pub fn validate_items(items: Vec<QotdItem>) -> Vec<QotdItem> {
    items.into_iter().filter(is_valid_item).collect()
}
