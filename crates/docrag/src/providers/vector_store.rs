//! Vector store provider trait for persisting and searching embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Chunk;

/// Metadata persisted alongside each vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Source filename
    pub filename: String,
    /// Chunk index within the source document
    pub chunk_index: u32,
}

/// A chunk's text plus its vector representation and metadata.
///
/// Immutable once written; uniquely identified by a key derived from
/// filename and chunk index, so re-ingesting overwrites instead of
/// duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Stable store key (`<filename>#<index>`)
    pub key: String,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Chunk text
    pub text: String,
    /// Provenance metadata
    pub metadata: RecordMetadata,
}

impl EmbeddingRecord {
    /// Build a record from a chunk and its embedding
    pub fn from_chunk(chunk: &Chunk, vector: Vec<f32>) -> Self {
        Self {
            key: chunk.record_key(),
            vector,
            text: chunk.text.clone(),
            metadata: RecordMetadata {
                filename: chunk.filename.clone(),
                chunk_index: chunk.index,
            },
        }
    }
}

/// A search hit with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    /// Store key of the matched record
    pub key: String,
    /// Similarity score, higher is more similar
    pub score: f32,
    /// Matched chunk text
    pub text: String,
    /// Provenance metadata
    pub metadata: RecordMetadata,
}

/// Capability trait for vector storage and nearest-neighbor search.
///
/// The store owns all embedding records; the core never holds a lock
/// across calls into it. Test doubles substitute a deterministic
/// in-memory implementation.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or overwrite a record under its key
    async fn upsert(&self, record: EmbeddingRecord) -> Result<()>;

    /// Return the `top_k` most similar records, ranked by descending
    /// similarity. Equal scores keep the store's native return order.
    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<ScoredRecord>>;

    /// Total number of stored records
    async fn count(&self) -> Result<usize>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
