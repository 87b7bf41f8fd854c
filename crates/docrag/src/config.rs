//! Configuration for the RAG core
//!
//! Defaults mirror the environment the system is usually deployed with
//! (local Ollama, 1024-character chunks with 100 characters of overlap).
//! `RagConfig::from_env` reads overrides from the process environment.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main RAG configuration, injected into the core by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Temporary upload spool directory
    pub temp_dir: TempDirConfig,
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of highest-similarity records returned per query
    pub top_k: usize,
    /// Number of LLM-generated rephrasings searched alongside the original
    /// question; 0 searches the original question only
    pub query_variants: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            query_variants: 0,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub embed_dimensions: usize,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests (client-level policy, the
    /// core pipeline itself never retries)
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            generate_model: "llama3.2".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
            max_retries: 3,
        }
    }
}

/// Temporary upload directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempDirConfig {
    /// Directory where uploads are spooled before extraction
    pub path: PathBuf,
}

impl Default for TempDirConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./_temp"),
        }
    }
}

impl RagConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CHUNK_SIZE`, `CHUNK_OVERLAP`, `TOP_K`,
    /// `QUERY_VARIANTS`, `OLLAMA_HOST`, `OLLAMA_PORT`, `LLM_MODEL`,
    /// `TEXT_EMBEDDING_MODEL`, `EMBEDDING_DIMENSIONS`, `TEMP_FOLDER`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = env_parse::<usize>("CHUNK_SIZE")? {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = env_parse::<usize>("CHUNK_OVERLAP")? {
            config.chunking.chunk_overlap = overlap;
        }
        if let Some(top_k) = env_parse::<usize>("TOP_K")? {
            config.retrieval.top_k = top_k;
        }
        if let Some(variants) = env_parse::<usize>("QUERY_VARIANTS")? {
            config.retrieval.query_variants = variants;
        }
        if let Some(dims) = env_parse::<usize>("EMBEDDING_DIMENSIONS")? {
            config.llm.embed_dimensions = dims;
        }

        let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("OLLAMA_PORT").unwrap_or_else(|_| "11434".to_string());
        config.llm.base_url = format!("http://{host}:{port}");

        if let Ok(model) = env::var("LLM_MODEL") {
            config.llm.generate_model = model;
        }
        if let Ok(model) = env::var("TEXT_EMBEDDING_MODEL") {
            config.llm.embed_model = model;
        }
        if let Ok(folder) = env::var("TEMP_FOLDER") {
            config.temp_dir.path = PathBuf::from(folder);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate chunking and retrieval parameters before any work is done
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::invalid_config("chunk_size must be greater than 0"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::invalid_config("top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Parse an optional environment variable, surfacing bad values instead of
/// silently ignoring them
fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            Error::invalid_config(format!("{name} has an unparseable value: '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}
