//! Hand-authored fallback daily questions.
//!
//! Used whenever live generation fails or yields nothing usable. Every
//! seed passes the same validation applied to generated candidates.

use purposely_core::model::QotdItem;

/// The built-in seed set, in fallback preference order.
pub fn all() -> Vec<QotdItem> {
    vec![
        QotdItem {
            question: "When your partner disappoints you, what do you need from them first: an apology, an explanation, or simply time and space?".to_string(),
            angle: "separates repair preferences from the conflict itself".to_string(),
            tags: vec!["communication".to_string(), "boundaries".to_string()],
            follow_ups: Some(vec!["Does your partner know that about you?".to_string()]),
            depth_score: 6,
        },
        QotdItem {
            question: "What is one small habit your partner does that quietly builds your trust in them, and have you ever told them about it?".to_string(),
            angle: "makes invisible trust deposits visible".to_string(),
            tags: vec!["trust".to_string()],
            follow_ups: None,
            depth_score: 5,
        },
        QotdItem {
            question: "How do you and your partner decide what counts as ours versus mine when it comes to money and spending?".to_string(),
            angle: "surfaces unspoken financial rules before they become fights".to_string(),
            tags: vec!["money".to_string()],
            follow_ups: Some(vec!["Where did that rule come from?".to_string()]),
            depth_score: 7,
        },
        QotdItem {
            question: "Which family expectation, spoken or unspoken, has shaped how you show up in your closest relationships today?".to_string(),
            angle: "connects family-of-origin patterns to present behavior".to_string(),
            tags: vec!["family".to_string()],
            follow_ups: None,
            depth_score: 8,
        },
        QotdItem {
            question: "When you feel distant from someone you love, what usually closes the gap faster: words, touch, or shared time?".to_string(),
            angle: "names each person's reconnection channel".to_string(),
            tags: vec!["intimacy".to_string(), "communication".to_string()],
            follow_ups: None,
            depth_score: 6,
        },
        QotdItem {
            question: "What boundary have you been meaning to set in a relationship, and what has made it hard to say out loud?".to_string(),
            angle: "moves a known boundary from intention to words".to_string(),
            tags: vec!["boundaries".to_string()],
            follow_ups: Some(vec!["What is the smallest version of saying it?".to_string()]),
            depth_score: 7,
        },
    ]
}

/// The terminal fallback when even the unique pool is empty.
pub fn first() -> QotdItem {
    all().remove(0)
}
