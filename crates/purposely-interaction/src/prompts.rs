//! Prompt builders for the three generation families.
//!
//! Each prompt carries an explicit JSON-only output contract; the parser
//! tolerates models that ignore it anyway.

use crate::context::ProfileContext;

fn context_block(context: &ProfileContext) -> String {
    let summary = context.summary();
    if summary.is_empty() {
        String::new()
    } else {
        format!("\n\nUser context:\n{}", summary)
    }
}

/// Prompt for a batch of `count` dating scenarios.
pub fn scenario_batch_prompt(count: usize, context: &ProfileContext) -> String {
    format!(
        "You are a relationship coach generating realistic dating dilemmas.\n\
         Generate {count} distinct scenarios. Each scenario is a short dilemma \
         someone might bring to a coach, plus a grounded, non-judgmental perspective.\n\
         Vary the topics: trust, boundaries, money, family, communication, intimacy.{ctx}\n\n\
         Output a JSON array of objects, each with exactly these fields:\n\
         [{{\"question\": \"...\", \"answer\": \"...\"}}]\n\n\
         IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks.",
        count = count,
        ctx = context_block(context),
    )
}

/// Prompt for a single scenario answering a user-submitted question.
pub fn scenario_single_prompt(user_question: &str, context: &ProfileContext) -> String {
    format!(
        "You are a relationship coach. A user asked:\n\"{question}\"\n\
         Restate their dilemma cleanly and give one grounded, non-judgmental perspective.{ctx}\n\n\
         Output a single JSON object with exactly these fields:\n\
         {{\"question\": \"...\", \"answer\": \"...\"}}\n\n\
         IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks.",
        question = user_question.trim(),
        ctx = context_block(context),
    )
}

/// Prompt for a batch of daily-question candidates.
pub fn daily_batch_prompt(count: usize, context: &ProfileContext) -> String {
    format!(
        "Generate {count} reflective questions a couple or dater could sit with for a day.\n\
         Each question must be a single sentence of roughly 14 to 28 words, clean language only.{ctx}\n\n\
         Output a JSON array of objects with these fields:\n\
         [{{\"question\": \"...\", \"angle\": \"why this is worth asking\", \
         \"tags\": [\"trust\"], \"follow_ups\": [\"...\"], \"depth_score\": 7}}]\n\n\
         IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks.",
        count = count,
        ctx = context_block(context),
    )
}
