//! Provider abstractions for embeddings, generation, and vector storage
//!
//! The embedding store and language model are external collaborators
//! accessed through capability traits, so a deterministic in-memory
//! store/model can substitute for the real backends in tests.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::{Generation, LlmProvider};
pub use memory::InMemoryVectorStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_store::{EmbeddingRecord, RecordMetadata, ScoredRecord, VectorStoreProvider};
