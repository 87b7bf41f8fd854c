//! Language model provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// A completed model call: generated text plus token usage as reported by
/// the model (passed through, never recomputed)
#[derive(Debug, Clone)]
pub struct Generation {
    /// Generated answer text
    pub text: String,
    /// Total tokens consumed by the call
    pub token_usage: u64,
}

/// Capability trait for LLM-based answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
