//! Sliding-window text chunking
//!
//! Windows are measured in characters. Window `i` starts at character
//! `i * (size - overlap)`; the last window is truncated to the remaining
//! text, never padded. Chunking is deterministic: the same text and
//! parameters always produce the same chunk sequence.

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker.
    ///
    /// Rejects `size == 0` and `overlap >= size` before any work.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_config("chunk_size must be greater than 0"));
        }
        if overlap >= chunk_size {
            return Err(Error::invalid_config(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazily chunk `text`, tagging every chunk with `filename`.
    ///
    /// Text shorter than the chunk size yields exactly one chunk containing
    /// the whole text.
    pub fn chunk<'a>(&self, filename: &'a str, text: &'a str) -> ChunkWindows<'a> {
        // Byte offsets of every character boundary, plus the end of the text,
        // so windows slice at valid UTF-8 boundaries.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());

        ChunkWindows {
            filename,
            text,
            boundaries,
            size: self.chunk_size,
            stride: self.chunk_size - self.overlap,
            next_start: 0,
            next_index: 0,
            done: false,
        }
    }
}

/// Lazy, restartable iterator over the chunk windows of one document
pub struct ChunkWindows<'a> {
    filename: &'a str,
    text: &'a str,
    /// Byte offset of each character boundary, ending with `text.len()`
    boundaries: Vec<usize>,
    size: usize,
    stride: usize,
    /// Start of the next window, in characters
    next_start: usize,
    next_index: u32,
    done: bool,
}

impl Iterator for ChunkWindows<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }

        let char_len = self.boundaries.len() - 1;
        let start = self.next_start;
        let end = (start + self.size).min(char_len);

        // A window that reaches the end of the text is the last one.
        if end == char_len {
            self.done = true;
        }

        let chunk = Chunk {
            filename: self.filename.to_string(),
            index: self.next_index,
            char_start: start,
            char_end: end,
            text: self.text[self.boundaries[start]..self.boundaries[end]].to_string(),
        };

        self.next_start = start + self.stride;
        self.next_index += 1;

        Some(chunk)
    }
}
