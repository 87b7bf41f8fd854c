//! Prompt templates for answer generation

use crate::types::RetrievedContext;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunk texts into the context string supplied
    /// to the model, each block tagged with its citation.
    pub fn build_context(context: &RetrievedContext) -> String {
        context
            .entries
            .iter()
            .map(|entry| format!("[{}]\n{}", entry.format_citation(), entry.text))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    /// Build the prompt asking the model for alternative phrasings of a
    /// question, one per line, used for multi-query retrieval.
    pub fn build_expansion_prompt(question: &str, variants: usize) -> String {
        format!(
            r#"You are an AI language model assistant. Your task is to generate {variants} different versions of the given user question to retrieve relevant documents from a vector database. By generating multiple perspectives on the user question, your goal is to help the user overcome some of the limitations of the distance-based similarity search. Provide these alternative questions separated by newlines.
Original question: {question}"#
        )
    }

    /// Build the answer prompt from the question and assembled context.
    ///
    /// With no retrieved context the model is still asked to answer, and
    /// told that no documents matched.
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        if context.is_empty() {
            return format!(
                r#"No documents matched the question. Answer from general knowledge and say that no source documents were available.

Question: {question}"#
            );
        }

        format!(
            r#"Answer the question using ONLY the following context:
{context}

Question: {question}"#
        )
    }
}
