//! In-memory vector store with cosine similarity
//!
//! The bundled `VectorStoreProvider` implementation, also used as the
//! deterministic test double. Records are kept in insertion order; search
//! ranks by cosine similarity with a stable sort, so equal scores preserve
//! the store's native (insertion) order.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};

use super::vector_store::{EmbeddingRecord, ScoredRecord, VectorStoreProvider};

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

struct MemoryIndex {
    /// Records in insertion order; upsert overwrites in place
    records: Vec<EmbeddingRecord>,
    /// Key to position in `records`
    by_key: HashMap<String, usize>,
}

/// In-memory vector store keyed by record key
pub struct InMemoryVectorStore {
    index: RwLock<MemoryIndex>,
    dimensions: usize,
}

impl InMemoryVectorStore {
    /// Create an empty store for vectors of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self {
            index: RwLock::new(MemoryIndex {
                records: Vec::new(),
                by_key: HashMap::new(),
            }),
            dimensions,
        }
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn upsert(&self, record: EmbeddingRecord) -> Result<()> {
        if record.vector.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "vector for '{}' has {} dimensions, store expects {}",
                record.key,
                record.vector.len(),
                self.dimensions
            )));
        }

        let mut index = self.index.write();
        if let Some(pos) = index.by_key.get(&record.key).copied() {
            index.records[pos] = record;
        } else {
            let pos = index.records.len();
            index.by_key.insert(record.key.clone(), pos);
            index.records.push(record);
        }
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<ScoredRecord>> {
        if query_vector.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "query vector has {} dimensions, store expects {}",
                query_vector.len(),
                self.dimensions
            )));
        }

        let index = self.index.read();
        let mut scored: Vec<ScoredRecord> = index
            .records
            .iter()
            .map(|record| ScoredRecord {
                key: record.key.clone(),
                score: cosine_similarity(query_vector, &record.vector),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
            })
            .collect();

        // Stable sort keeps insertion order for equal scores; total_cmp gives
        // a total order even for NaN scores.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.index.read().records.len())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
