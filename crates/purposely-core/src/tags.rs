//! Keyword-based topical tagging.
//!
//! Tags come from a fixed taxonomy matched against the text, never from
//! the model. Patterns favor multi-word phrases where a single word would
//! match normal prose too easily.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed taxonomy: tag name plus its lowercased keyword list, in
/// detection order.
const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "trust",
        &[
            "trust", "honesty", "honest", "lied", "lying", "lies", "secret", "secrets", "cheat",
            "cheated", "cheating", "faithful", "loyal", "loyalty", "hiding",
        ],
    ),
    (
        "boundaries",
        &[
            "boundary", "boundaries", "personal space", "privacy", "said no", "pushing me",
            "comfortable with", "too far", "crossed a line",
        ],
    ),
    (
        "inconsistency",
        &[
            "mixed signals", "hot and cold", "inconsistent", "flaky", "breadcrumb",
            "breadcrumbing", "ghost", "ghosted", "ghosting", "cancelled last minute",
            "never follows through",
        ],
    ),
    (
        "money",
        &[
            "money", "pay", "pays", "paying", "paid", "bill", "finances", "financial", "debt",
            "broke", "expensive", "cheap", "salary", "spending",
        ],
    ),
    (
        "intimacy",
        &[
            "intimacy", "intimate", "affection", "physical", "sex", "sexual", "kiss", "kissing",
            "touch", "closeness", "distant lately",
        ],
    ),
    (
        "family",
        &[
            "family", "parents", "mother", "father", "mom", "dad", "in-laws", "sibling",
            "siblings", "kids", "children",
        ],
    ),
    (
        "post-breakup",
        &[
            "ex", "broke up", "breakup", "break up", "moved on", "closure", "get back together",
            "rebound",
        ],
    ),
    (
        "communication",
        &[
            "communicate", "communication", "listen", "listening", "texting", "texts", "responds",
            "conversation", "argue", "arguing", "argument", "talk about it", "shuts down",
        ],
    ),
    (
        "jealousy",
        &[
            "jealous", "jealousy", "insecure", "insecurity", "flirting", "flirts",
            "attention from",
        ],
    ),
    (
        "long-distance",
        &[
            "long distance", "long-distance", "different city", "moving away", "time zones",
            "visits",
        ],
    ),
];

/// One compiled whole-word alternation per tag, built once.
static TAG_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TAXONOMY
        .iter()
        .map(|(tag, keywords)| {
            let alternation = keywords
                .iter()
                .map(|keyword| regex::escape(keyword))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\b(?:{})\b", alternation);
            (*tag, Regex::new(&pattern).expect("taxonomy patterns are static and valid"))
        })
        .collect()
});

/// Assigns topical tags to a question/answer pair.
///
/// Deterministic, never fails; unmatched text yields an empty list. Tags
/// appear in taxonomy order and are never duplicated.
pub fn detect_tags(question: &str, answer: &str) -> Vec<String> {
    let combined = format!("{} {}", question, answer).to_lowercase();

    TAG_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(&combined))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}
