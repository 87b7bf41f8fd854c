//! docrag CLI
//!
//! Ingests the given documents into an in-memory store, answers one
//! question against them via Ollama, and prints the answer with its
//! sources and the monitoring counters.

use std::path::PathBuf;

use clap::Parser;
use docrag::providers::OllamaClient;
use docrag::{QueryRequest, RagConfig, RagEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docrag", about = "Ask questions against PDF and Markdown documents")]
struct Cli {
    /// Documents to ingest (PDF or Markdown)
    #[arg(short, long = "file", required = true)]
    files: Vec<PathBuf>,

    /// The question to answer
    query: String,

    /// Chunk size in characters
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overlap between chunks in characters
    #[arg(long)]
    chunk_overlap: Option<usize>,

    /// Number of chunks to retrieve per query
    #[arg(long)]
    top_k: Option<usize>,

    /// Number of LLM-generated query rephrasings to search (0 disables)
    #[arg(long)]
    query_variants: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = RagConfig::from_env()?;
    if let Some(size) = cli.chunk_size {
        config.chunking.chunk_size = size;
    }
    if let Some(overlap) = cli.chunk_overlap {
        config.chunking.chunk_overlap = overlap;
    }
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    if let Some(variants) = cli.query_variants {
        config.retrieval.query_variants = variants;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Chunk overlap: {}", config.chunking.chunk_overlap);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    let client = OllamaClient::new(&config.llm)?;
    if !client.health_check().await? {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Start it with: ollama serve");
        tracing::warn!(
            "Then pull models: ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    let engine = RagEngine::with_ollama(config)?;

    for path in &cli.files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)?;

        let report = engine.ingest_upload(&filename, &bytes).await?;
        println!("Ingested {} ({} chunks)", report.filename, report.chunks_written);
    }

    let response = engine
        .retrieve_and_answer(&QueryRequest::new(cli.query))
        .await?;

    println!("\n{}\n", response.response);
    if response.sources.is_empty() {
        println!("Sources: none");
    } else {
        println!("Sources:");
        for source in &response.sources {
            println!("  - {source}");
        }
    }
    println!(
        "\nTook {:.2}s, {} tokens",
        response.response_time.as_secs_f64(),
        response.token_usage
    );

    let snapshot = engine.monitoring_snapshot();
    tracing::info!(
        success_count = snapshot.success_count,
        failure_count = snapshot.failure_count,
        "session counters"
    );

    Ok(())
}
