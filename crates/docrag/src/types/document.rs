//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Supported document formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Markdown file
    Markdown,
}

impl DocumentFormat {
    /// Detect format from a filename extension.
    ///
    /// Anything other than PDF or Markdown is rejected before extraction.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = filename
            .rsplit('.')
            .next()
            .filter(|ext| !ext.is_empty() && *ext != filename)
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat(format!("'{filename}' has no extension")))?;

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Markdown => "Markdown",
        }
    }
}

/// A document to be ingested. Transient: exists only for the duration of
/// the ingestion call.
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Detected format
    pub format: DocumentFormat,
    /// Raw byte content
    pub bytes: Vec<u8>,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a document from raw bytes, detecting the format by extension
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let filename = filename.into();
        let format = DocumentFormat::from_filename(&filename)?;

        Ok(Self {
            id: Uuid::new_v4(),
            filename,
            format,
            bytes,
            ingested_at: chrono::Utc::now(),
        })
    }
}

/// An ordered slice of a document's extracted text, the unit of embedding
/// and retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Source filename
    pub filename: String,
    /// Sequence index within the document
    pub index: u32,
    /// Start offset in characters
    pub char_start: usize,
    /// End offset in characters (exclusive)
    pub char_end: usize,
    /// Text content
    pub text: String,
}

impl Chunk {
    /// Stable store key derived from filename and chunk index.
    ///
    /// Re-ingesting a file writes the same keys, so records are overwritten
    /// rather than duplicated.
    pub fn record_key(&self) -> String {
        format!("{}#{}", self.filename, self.index)
    }

    /// Citation string in the form `<filename> (Chunk <index>)`
    pub fn format_citation(&self) -> String {
        format!("{} (Chunk {})", self.filename, self.index)
    }
}
