//! Core types for the RAG pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, DocumentFormat};
pub use query::QueryRequest;
pub use response::{IngestReport, MonitoringSnapshot, QueryResponse, RetrievedContext, ScoredChunk};
