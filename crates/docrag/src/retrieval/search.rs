//! Similarity retrieval and context assembly

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{RetrievedContext, ScoredChunk};

use super::expansion::QueryExpander;

/// Retrieves the most relevant chunks for a query.
///
/// Uses the same embedding provider as ingestion; a dimensionality mismatch
/// between the query vector and the provider's declared output is fatal,
/// never silently truncated or padded. An empty store yields an empty
/// context, not an error.
///
/// With an expander attached, retrieval searches the original question plus
/// the model's rephrasings and returns the union, still deduplicated and
/// bounded by top-k.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    expander: Option<QueryExpander>,
}

impl Retriever {
    /// Create a retriever over the given providers
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self {
            embedder,
            store,
            expander: None,
        }
    }

    /// Create a retriever that expands each query before searching
    pub fn with_expander(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        expander: QueryExpander,
    ) -> Self {
        Self {
            embedder,
            store,
            expander: Some(expander),
        }
    }

    /// Retrieve up to `top_k` chunks ranked by descending similarity.
    ///
    /// Equal scores keep the store's native return order (the merge sort is
    /// stable and first occurrence wins). Duplicate keys are dropped; a key
    /// hit by several query variants keeps its best score.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievedContext> {
        let queries = match &self.expander {
            Some(expander) => expander.expand(query).await,
            None => vec![query.to_string()],
        };

        let expected = self.embedder.dimensions();
        let mut entries: Vec<ScoredChunk> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for q in &queries {
            let query_vector = self.embedder.embed(q).await?;
            if query_vector.len() != expected {
                return Err(Error::embedding(format!(
                    "query embedding has {} dimensions, expected {expected}",
                    query_vector.len()
                )));
            }

            for hit in self.store.search(&query_vector, top_k).await? {
                if let Some(&pos) = by_key.get(&hit.key) {
                    if hit.score > entries[pos].score {
                        entries[pos].score = hit.score;
                    }
                } else {
                    by_key.insert(hit.key.clone(), entries.len());
                    entries.push(ScoredChunk {
                        key: hit.key,
                        text: hit.text,
                        score: hit.score,
                        filename: hit.metadata.filename,
                        chunk_index: hit.metadata.chunk_index,
                    });
                }
            }
        }

        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(top_k);

        tracing::debug!(
            retrieved = entries.len(),
            queries = queries.len(),
            top_k,
            store = self.store.name(),
            "retrieval completed"
        );

        Ok(RetrievedContext { entries })
    }
}
