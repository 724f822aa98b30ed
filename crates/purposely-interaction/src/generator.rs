//! Text-generation collaborator trait.

use async_trait::async_trait;
use purposely_core::error::Result;

use crate::context::ProfileContext;

/// What kind of content a generation call is for. Implementations may
/// route modes to different models or token budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// A batch of scenarios as a JSON array.
    ScenarioBatch,
    /// A single scenario as a JSON object.
    ScenarioSingle,
    /// A batch of daily-question candidates.
    DailyBatch,
}

/// The upstream LLM-backed collaborator.
///
/// Implementations own authentication and provider selection; the engine
/// applies only its own timeout and retry policy on top. The returned
/// text is ideally JSON but is treated as untrusted free-form input.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        context: &ProfileContext,
        mode: GenerationMode,
    ) -> Result<String>;
}
