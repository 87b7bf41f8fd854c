//! Transport-boundary facade wiring the pipeline together
//!
//! `RagEngine` exposes the plain function-level contracts an external
//! transport (HTTP layer, CLI) calls: ingest, retrieve-and-answer, and
//! the monitoring snapshot. It owns no transport concerns itself.

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerSynthesizer;
use crate::ingestion::IngestionPipeline;
use crate::monitoring::QueryMonitor;
use crate::providers::{
    EmbeddingProvider, InMemoryVectorStore, LlmProvider, OllamaClient, OllamaEmbedder, OllamaLlm,
    VectorStoreProvider,
};
use crate::retrieval::{QueryExpander, Retriever};
use crate::types::{Document, IngestReport, MonitoringSnapshot, QueryRequest, QueryResponse};

/// The assembled RAG core
pub struct RagEngine {
    config: RagConfig,
    pipeline: IngestionPipeline,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    monitor: Arc<QueryMonitor>,
}

impl RagEngine {
    /// Assemble an engine from configuration and providers
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let monitor = Arc::new(QueryMonitor::new());
        let pipeline = IngestionPipeline::new(&config, Arc::clone(&embedder), Arc::clone(&store))?;
        let retriever = match config.retrieval.query_variants {
            0 => Retriever::new(embedder, store),
            variants => Retriever::with_expander(
                embedder,
                store,
                QueryExpander::new(Arc::clone(&llm), variants),
            ),
        };
        let synthesizer = AnswerSynthesizer::new(llm, Arc::clone(&monitor));

        Ok(Self {
            config,
            pipeline,
            retriever,
            synthesizer,
            monitor,
        })
    }

    /// Assemble an engine backed by Ollama and the in-memory vector store
    pub fn with_ollama(config: RagConfig) -> Result<Self> {
        config.validate()?;

        let client = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::from_client(
            Arc::clone(&client),
            config.llm.embed_dimensions,
        ));
        let llm = Arc::new(OllamaLlm::from_client(
            client,
            config.llm.generate_model.clone(),
        ));
        let store = Arc::new(InMemoryVectorStore::new(config.llm.embed_dimensions));

        Self::new(config, embedder, store, llm)
    }

    /// Ingest one document
    pub async fn ingest(&self, document: &Document) -> Result<IngestReport> {
        self.pipeline.ingest(document).await
    }

    /// Ingest an uploaded file, spooled through the configured temp directory
    pub async fn ingest_upload(&self, filename: &str, bytes: &[u8]) -> Result<IngestReport> {
        self.pipeline
            .ingest_upload(filename, bytes, &self.config.temp_dir.path)
            .await
    }

    /// Answer a query: retrieve the top-k chunks, then synthesize.
    ///
    /// Every call updates exactly one monitoring counter exactly once: a
    /// failure before synthesis (empty query, embedding or store error) is
    /// recorded here; synthesis records its own outcome.
    pub async fn retrieve_and_answer(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if request.is_empty() {
            self.monitor.record_outcome(false);
            return Err(Error::invalid_config("query is empty"));
        }

        let context = match self
            .retriever
            .retrieve(&request.query, self.config.retrieval.top_k)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                self.monitor.record_outcome(false);
                return Err(e);
            }
        };

        self.synthesizer.synthesize(&request.query, &context).await
    }

    /// Current success/failure counters
    pub fn monitoring_snapshot(&self) -> MonitoringSnapshot {
        self.monitor.snapshot()
    }
}
