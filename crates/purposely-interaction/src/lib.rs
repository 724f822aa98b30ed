//! The text-generation collaborator seam and its implementations.

pub mod claude_generator;
pub mod context;
pub mod generator;
pub mod prompts;

pub use claude_generator::ClaudeApiGenerator;
pub use context::ProfileContext;
pub use generator::{GenerationMode, TextGenerator};
