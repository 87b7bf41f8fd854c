//! Error types for the RAG core

use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG core errors
#[derive(Debug, Error)]
pub enum Error {
    /// Bad chunking or retrieval parameters, rejected before any work
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unrecognized document type, rejected before extraction
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File could not be parsed into text
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Embedding model could not produce a vector, aborts the ingestion batch
    #[error("Embedding generation failed: {0}")]
    EmbeddingFailure(String),

    /// Vector store write/read error, with the count of records persisted
    /// before the error so partial success is reported honestly
    #[error("Vector store error after {persisted} records persisted: {message}")]
    StorageFailure { persisted: usize, message: String },

    /// Language model call failed, no answer returned
    #[error("Answer generation failed: {0}")]
    GenerationFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding failure
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingFailure(message.into())
    }

    /// Create a storage failure with the persisted-record count
    pub fn storage(persisted: usize, message: impl Into<String>) -> Self {
        Self::StorageFailure {
            persisted,
            message: message.into(),
        }
    }

    /// Create a generation failure
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailure(message.into())
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Configuration and format errors are permanent; I/O, storage, and
    /// model-call failures are transient. The core itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidConfiguration(_) | Self::UnsupportedFormat(_) | Self::FileParse { .. } => {
                false
            }
            Self::EmbeddingFailure(_)
            | Self::StorageFailure { .. }
            | Self::GenerationFailure(_)
            | Self::Io(_)
            | Self::Http(_) => true,
        }
    }
}
