//! LLM-backed multi-query expansion
//!
//! Asks the language model for alternative phrasings of the question so
//! retrieval can search several perspectives on it. Expansion is a
//! best-effort step: if the model call fails, retrieval proceeds with the
//! original question alone.

use std::sync::Arc;

use crate::generation::PromptBuilder;
use crate::providers::LlmProvider;

/// Expands one question into itself plus LLM-generated rephrasings
pub struct QueryExpander {
    llm: Arc<dyn LlmProvider>,
    variants: usize,
}

impl QueryExpander {
    /// Create an expander that requests `variants` rephrasings per query
    pub fn new(llm: Arc<dyn LlmProvider>, variants: usize) -> Self {
        Self { llm, variants }
    }

    /// Expand `query` into a list of search queries, the original first.
    ///
    /// The model's response is split on newlines; blank lines are dropped
    /// and at most `variants` rephrasings are kept. A failed model call
    /// falls back to the original query only.
    pub async fn expand(&self, query: &str) -> Vec<String> {
        let prompt = PromptBuilder::build_expansion_prompt(query, self.variants);

        let mut queries = vec![query.to_string()];
        match self.llm.generate(&prompt).await {
            Ok(generation) => {
                queries.extend(
                    generation
                        .text
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .take(self.variants)
                        .map(String::from),
                );
            }
            Err(e) => {
                tracing::warn!(
                    model = self.llm.model(),
                    error = %e,
                    "query expansion failed, searching with the original query only"
                );
            }
        }

        tracing::debug!(queries = queries.len(), "query expansion completed");
        queries
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::{Error, Result};
    use crate::providers::Generation;

    struct RephrasingLlm {
        response: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for RephrasingLlm {
        async fn generate(&self, _prompt: &str) -> Result<Generation> {
            if self.fail {
                return Err(Error::generation("model unavailable"));
            }
            Ok(Generation {
                text: self.response.to_string(),
                token_usage: 0,
            })
        }

        fn name(&self) -> &str {
            "rephrase-mock"
        }

        fn model(&self) -> &str {
            "rephrase-model"
        }
    }

    #[tokio::test]
    async fn test_expansion_keeps_original_first_and_drops_blank_lines() {
        let llm = Arc::new(RephrasingLlm {
            response: "How long is the warranty period?\n\n  What is the warranty duration?  \n",
            fail: false,
        });
        let expander = QueryExpander::new(llm, 5);

        let queries = expander.expand("How long is the warranty?").await;
        assert_eq!(
            queries,
            vec![
                "How long is the warranty?",
                "How long is the warranty period?",
                "What is the warranty duration?",
            ]
        );
    }

    #[tokio::test]
    async fn test_expansion_caps_variant_count() {
        let llm = Arc::new(RephrasingLlm {
            response: "one\ntwo\nthree\nfour",
            fail: false,
        });
        let expander = QueryExpander::new(llm, 2);

        let queries = expander.expand("q").await;
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "q");
    }

    #[tokio::test]
    async fn test_failed_expansion_falls_back_to_original_query() {
        let llm = Arc::new(RephrasingLlm {
            response: "",
            fail: true,
        });
        let expander = QueryExpander::new(llm, 5);

        let queries = expander.expand("still works").await;
        assert_eq!(queries, vec!["still works"]);
    }
}
