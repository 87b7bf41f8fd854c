//! Answer synthesis with wall-clock timing and outcome counting

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::monitoring::QueryMonitor;
use crate::providers::LlmProvider;
use crate::types::{QueryResponse, RetrievedContext};

use super::prompt::PromptBuilder;

/// Generates an answer from a query and its retrieved context.
///
/// Every call updates exactly one monitoring counter: success on a
/// completed generation, failure otherwise. A failed model call returns
/// `GenerationFailure` with no partial response.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
    monitor: Arc<QueryMonitor>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer over the given model and monitor
    pub fn new(llm: Arc<dyn LlmProvider>, monitor: Arc<QueryMonitor>) -> Self {
        Self { llm, monitor }
    }

    /// Synthesize an answer. An empty context still produces an answer,
    /// flagged by empty `sources`.
    pub async fn synthesize(
        &self,
        query: &str,
        context: &RetrievedContext,
    ) -> Result<QueryResponse> {
        let context_text = PromptBuilder::build_context(context);
        let prompt = PromptBuilder::build_answer_prompt(query, &context_text);

        let started = Instant::now();
        let generation = match self.llm.generate(&prompt).await {
            Ok(generation) => generation,
            Err(e) => {
                self.monitor.record_outcome(false);
                tracing::warn!(model = self.llm.model(), error = %e, "generation failed");
                return Err(match e {
                    Error::GenerationFailure(msg) => Error::GenerationFailure(msg),
                    other => Error::generation(other.to_string()),
                });
            }
        };
        let elapsed = started.elapsed();

        self.monitor.record_outcome(true);
        tracing::info!(
            model = self.llm.model(),
            elapsed_secs = elapsed.as_secs_f64(),
            token_usage = generation.token_usage,
            sources = context.len(),
            "answer generated"
        );

        Ok(QueryResponse {
            response: generation.text,
            context: context_text,
            sources: context.citations(),
            response_time: elapsed,
            token_usage: generation.token_usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::providers::Generation;
    use crate::types::ScoredChunk;

    struct MockLlm {
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        async fn generate(&self, prompt: &str) -> Result<Generation> {
            if self.fail {
                return Err(Error::generation("model unavailable"));
            }
            Ok(Generation {
                text: format!("answer ({} prompt chars)", prompt.len()),
                token_usage: 17,
            })
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    fn context_with_one_source() -> RetrievedContext {
        RetrievedContext {
            entries: vec![ScoredChunk {
                key: "handbook.md#4".to_string(),
                text: "The limit is 500 units.".to_string(),
                score: 0.88,
                filename: "handbook.md".to_string(),
                chunk_index: 4,
            }],
        }
    }

    #[tokio::test]
    async fn test_success_increments_success_counter_once() {
        let monitor = Arc::new(QueryMonitor::new());
        let synthesizer = AnswerSynthesizer::new(Arc::new(MockLlm { fail: false }), monitor.clone());

        let response = synthesizer
            .synthesize("What is the limit?", &context_with_one_source())
            .await
            .unwrap();

        assert_eq!(response.sources, vec!["handbook.md (Chunk 4)"]);
        assert_eq!(response.token_usage, 17);
        assert!(response.context.contains("The limit is 500 units."));

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.success_count, 1);
        assert_eq!(snapshot.failure_count, 0);
    }

    #[tokio::test]
    async fn test_failure_increments_failure_counter_and_returns_nothing() {
        let monitor = Arc::new(QueryMonitor::new());
        let synthesizer = AnswerSynthesizer::new(Arc::new(MockLlm { fail: true }), monitor.clone());

        let err = synthesizer
            .synthesize("What is the limit?", &context_with_one_source())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GenerationFailure(_)));

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.success_count, 0);
        assert_eq!(snapshot.failure_count, 1);
    }

    #[tokio::test]
    async fn test_empty_context_still_answers_with_empty_sources() {
        let monitor = Arc::new(QueryMonitor::new());
        let synthesizer = AnswerSynthesizer::new(Arc::new(MockLlm { fail: false }), monitor);

        let response = synthesizer
            .synthesize("Anything at all?", &RetrievedContext::empty())
            .await
            .unwrap();

        assert!(response.sources.is_empty());
        assert!(response.context.is_empty());
        assert!(!response.response.is_empty());
    }

    #[tokio::test]
    async fn test_counters_match_outcome_history() {
        let monitor = Arc::new(QueryMonitor::new());
        let ok = AnswerSynthesizer::new(Arc::new(MockLlm { fail: false }), monitor.clone());
        let bad = AnswerSynthesizer::new(Arc::new(MockLlm { fail: true }), monitor.clone());
        let context = RetrievedContext::empty();

        for _ in 0..4 {
            ok.synthesize("q", &context).await.unwrap();
        }
        for _ in 0..2 {
            let _ = bad.synthesize("q", &context).await;
        }

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.success_count, 4);
        assert_eq!(snapshot.failure_count, 2);
    }
}
