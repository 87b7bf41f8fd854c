//! Plain-text extraction for supported document formats

use crate::error::{Error, Result};
use crate::types::{Document, DocumentFormat};

/// Extracts plain text from raw document bytes
pub struct FileParser;

impl FileParser {
    /// Extract the full text of a document.
    ///
    /// PDF pages are concatenated into one string; Markdown is taken as raw
    /// UTF-8. A document with no readable text is rejected.
    pub fn extract_text(document: &Document) -> Result<String> {
        let text = match document.format {
            DocumentFormat::Pdf => Self::extract_pdf(&document.filename, &document.bytes)?,
            DocumentFormat::Markdown => Self::extract_markdown(&document.filename, &document.bytes)?,
        };

        if text.trim().is_empty() {
            return Err(Error::file_parse(
                &document.filename,
                "document contains no readable text",
            ));
        }

        Ok(text)
    }

    fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("PDF extraction failed: {e}")))
    }

    fn extract_markdown(filename: &str, data: &[u8]) -> Result<String> {
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::file_parse(filename, format!("invalid UTF-8: {e}")))
    }
}
