//! Query request type

use serde::{Deserialize, Serialize};

/// A natural-language query against the ingested corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question text
    pub query: String,
}

impl QueryRequest {
    /// Create a new query request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Whether the query is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}
