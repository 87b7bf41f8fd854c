//! Retrieval and answer response types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A retrieved chunk with its similarity score and source citation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Store key of the underlying record
    pub key: String,
    /// Chunk text
    pub text: String,
    /// Similarity score, higher is more similar
    pub score: f32,
    /// Source filename
    pub filename: String,
    /// Chunk index within the source document
    pub chunk_index: u32,
}

impl ScoredChunk {
    /// Citation string in the form `<filename> (Chunk <index>)`
    pub fn format_citation(&self) -> String {
        format!("{} (Chunk {})", self.filename, self.chunk_index)
    }
}

/// Ordered retrieval result, ranked by descending similarity and bounded
/// by the configured top-k
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedContext {
    /// Retrieved entries, best match first
    pub entries: Vec<ScoredChunk>,
}

impl RetrievedContext {
    /// Create an empty context (valid result for an empty store)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no chunks were retrieved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of retrieved chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Source citations in retrieval order
    pub fn citations(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.format_citation()).collect()
    }
}

/// Generated answer with provenance and usage statistics. Transient,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer text
    pub response: String,
    /// Concatenated context supplied to the model
    pub context: String,
    /// Source citations, one per retrieved chunk
    pub sources: Vec<String>,
    /// Wall-clock time around the model call
    #[serde(with = "duration_secs")]
    pub response_time: Duration,
    /// Token usage as reported by the model call, not recomputed
    pub token_usage: u64,
}

/// Result of a successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Document ID assigned at ingestion
    pub document_id: Uuid,
    /// Source filename
    pub filename: String,
    /// Number of chunks written to the store
    pub chunks_written: usize,
}

/// Snapshot of the process-wide monitoring counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    /// Queries that produced an answer
    pub success_count: u64,
    /// Queries that failed
    pub failure_count: u64,
}

/// Serialize a Duration as fractional seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
