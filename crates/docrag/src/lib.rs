//! docrag: RAG ingestion-and-retrieval core
//!
//! Ingests PDF and Markdown documents, splits them into overlapping
//! fixed-size chunks, stores chunk embeddings in a vector store, and
//! answers natural-language queries by retrieving the most similar chunks
//! and feeding them as cited context to a language model. Query outcomes
//! are tallied in process-wide monitoring counters.
//!
//! The embedding store, embedding model, and language model are external
//! collaborators behind capability traits; Ollama-backed and in-memory
//! implementations are bundled. Transport (HTTP, CLI) is the caller's
//! concern: the engine exposes plain async functions.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod monitoring;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use monitoring::QueryMonitor;
pub use types::{
    Chunk, Document, DocumentFormat, IngestReport, MonitoringSnapshot, QueryRequest,
    QueryResponse, RetrievedContext, ScoredChunk,
};
