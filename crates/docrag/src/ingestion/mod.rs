//! Document ingestion pipeline: extract, chunk, embed, store

mod chunker;
mod parser;

pub use chunker::{ChunkWindows, TextChunker};
pub use parser::FileParser;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, EmbeddingRecord, VectorStoreProvider};
use crate::types::{Chunk, Document, IngestReport};

/// Ingestion pipeline: turns a document into embedded, stored chunks.
///
/// All chunks of one document are embedded before anything is written, so
/// an embedding failure commits nothing. If the store fails mid-batch the
/// error reports how many records were persisted before it.
pub struct IngestionPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl IngestionPipeline {
    /// Create a pipeline from configuration and providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

        Ok(Self {
            chunker,
            embedder,
            store,
        })
    }

    /// Ingest one document: extract text, chunk, embed, and store.
    pub async fn ingest(&self, document: &Document) -> Result<IngestReport> {
        let text = FileParser::extract_text(document)?;
        let chunks: Vec<Chunk> = self.chunker.chunk(&document.filename, &text).collect();

        tracing::info!(
            filename = %document.filename,
            format = document.format.display_name(),
            chunks = chunks.len(),
            "document extracted and chunked"
        );

        let records = self.embed_chunks(&chunks).await?;

        let mut persisted = 0usize;
        for record in records {
            self.store
                .upsert(record)
                .await
                .map_err(|e| match e {
                    Error::StorageFailure { message, .. } => Error::storage(persisted, message),
                    other => Error::storage(persisted, other.to_string()),
                })?;
            persisted += 1;
        }

        tracing::info!(
            filename = %document.filename,
            chunks_written = persisted,
            store = self.store.name(),
            "document ingested"
        );

        Ok(IngestReport {
            document_id: document.id,
            filename: document.filename.clone(),
            chunks_written: persisted,
        })
    }

    /// Ingest an uploaded file, spooling it through a temporary file.
    ///
    /// The spool file is removed on every exit path (success, format error,
    /// embedding error): `NamedTempFile` deletes on drop.
    pub async fn ingest_upload(
        &self,
        filename: &str,
        bytes: &[u8],
        temp_dir: &Path,
    ) -> Result<IngestReport> {
        // Reject unsupported formats before anything touches the disk.
        crate::types::DocumentFormat::from_filename(filename)?;

        std::fs::create_dir_all(temp_dir)?;

        let mut spool = tempfile::NamedTempFile::new_in(temp_dir)?;
        spool.write_all(bytes)?;
        spool.flush()?;

        tracing::debug!(filename, spool = %spool.path().display(), "upload spooled");

        let data = std::fs::read(spool.path())?;
        let document = Document::from_bytes(filename, data)?;
        self.ingest(&document).await
    }

    /// Embed every chunk up front through the provider's batch entry point.
    /// Any failure, including a dimensionality mismatch, aborts the batch
    /// before a single write.
    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<EmbeddingRecord>> {
        let Some(first) = chunks.first() else {
            return Ok(Vec::new());
        };

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| Error::embedding(format!("batch for '{}': {e}", first.filename)))?;

        let expected = self.embedder.dimensions();
        let mut records = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.iter().zip(vectors) {
            if vector.len() != expected {
                return Err(Error::embedding(format!(
                    "chunk {} of '{}': model returned {} dimensions, expected {expected}",
                    chunk.index,
                    chunk.filename,
                    vector.len()
                )));
            }
            records.push(EmbeddingRecord::from_chunk(chunk, vector));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::providers::InMemoryVectorStore;

    /// Deterministic embedder: a unit vector seeded by the text bytes
    struct MockEmbedder {
        dims: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let seed = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let mut v: Vec<f32> = (0..self.dims)
                .map(|i| (((seed >> (i % 64)) & 1) as f32) + 0.1)
                .collect();
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            v.iter_mut().for_each(|x| *x /= norm);
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Embedder that fails on the nth call
    struct FailingEmbedder {
        dims: usize,
        fail_on_call: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_on_call {
                return Err(Error::embedding("model unavailable"));
            }
            Ok(vec![1.0; self.dims])
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "failing-mock"
        }
    }

    /// Embedder with native batching; the single-text path must stay unused
    struct BatchingEmbedder {
        dims: usize,
        batch_calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for BatchingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::embedding("single-text path should not be used"))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0; self.dims]).collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "batching-mock"
        }
    }

    /// Embedder that returns the wrong dimensionality
    struct WrongDimsEmbedder;

    #[async_trait]
    impl EmbeddingProvider for WrongDimsEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; 3])
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn name(&self) -> &str {
            "wrong-dims-mock"
        }
    }

    /// Store that fails after a fixed number of successful upserts
    struct FlakyStore {
        inner: InMemoryVectorStore,
        fail_after: usize,
        upserts: AtomicUsize,
    }

    #[async_trait]
    impl VectorStoreProvider for FlakyStore {
        async fn upsert(&self, record: EmbeddingRecord) -> Result<()> {
            if self.upserts.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
                return Err(Error::storage(0, "write failed"));
            }
            self.inner.upsert(record).await
        }

        async fn search(
            &self,
            query_vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<crate::providers::ScoredRecord>> {
            self.inner.search(query_vector, top_k).await
        }

        async fn count(&self) -> Result<usize> {
            self.inner.count().await
        }

        fn name(&self) -> &str {
            "flaky-mock"
        }
    }

    fn pipeline_with(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> IngestionPipeline {
        let config = RagConfig::default();
        IngestionPipeline::new(&config, embedder, store).unwrap()
    }

    fn markdown_doc(chars: usize) -> Document {
        Document::from_bytes("doc.md", "y".repeat(chars).into_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_writes_all_chunks() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let pipeline = pipeline_with(Arc::new(MockEmbedder { dims: 8 }), store.clone());

        let report = pipeline.ingest(&markdown_doc(2500)).await.unwrap();
        assert_eq!(report.chunks_written, 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reingest_overwrites_instead_of_duplicating() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let pipeline = pipeline_with(Arc::new(MockEmbedder { dims: 8 }), store.clone());

        let doc = markdown_doc(2500);
        pipeline.ingest(&doc).await.unwrap();
        pipeline.ingest(&doc).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_ingest_embeds_through_the_batch_entry_point() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let embedder = Arc::new(BatchingEmbedder {
            dims: 8,
            batch_calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(embedder.clone(), store.clone());

        pipeline.ingest(&markdown_doc(2500)).await.unwrap();

        // One document, one batch call covering all three chunks.
        assert_eq!(embedder.batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_embedding_failure_commits_nothing() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let embedder = Arc::new(FailingEmbedder {
            dims: 8,
            fail_on_call: 2,
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(embedder, store.clone());

        // Three chunks; the embedder dies on the second.
        let err = pipeline.ingest(&markdown_doc(2500)).await.unwrap_err();
        assert!(matches!(err, Error::EmbeddingFailure(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_aborts_batch() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let pipeline = pipeline_with(Arc::new(WrongDimsEmbedder), store.clone());

        let err = pipeline.ingest(&markdown_doc(100)).await.unwrap_err();
        assert!(matches!(err, Error::EmbeddingFailure(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_reports_persisted_count() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryVectorStore::new(8),
            fail_after: 2,
            upserts: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(Arc::new(MockEmbedder { dims: 8 }), store);

        let err = pipeline.ingest(&markdown_doc(2500)).await.unwrap_err();
        match err {
            Error::StorageFailure { persisted, .. } => assert_eq!(persisted, 2),
            other => panic!("expected StorageFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_upload_rejected_and_spool_cleaned() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let pipeline = pipeline_with(Arc::new(MockEmbedder { dims: 8 }), store);
        let temp_dir = tempfile::tempdir().unwrap();

        let err = pipeline
            .ingest_upload("slides.pptx", b"data", temp_dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));

        let leftover = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_upload_spool_cleaned_on_success() {
        let store = Arc::new(InMemoryVectorStore::new(8));
        let pipeline = pipeline_with(Arc::new(MockEmbedder { dims: 8 }), store);
        let temp_dir = tempfile::tempdir().unwrap();

        pipeline
            .ingest_upload("notes.md", b"short but real note", temp_dir.path())
            .await
            .unwrap();

        let leftover = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }
}
