//! Ollama-backed embedding and generation providers
//!
//! Wraps the Ollama HTTP API with timeout and exponential-backoff retry.
//! Retry is a client-level policy; the core pipeline never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::{Generation, LlmProvider};

/// Ollama API client with automatic retry
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            config: config.clone(),
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::generation("unknown Ollama error")))
    }

    /// Check if Ollama is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let model = self.config.embed_model.clone();
        let text = text.to_string();
        let client = self.client.clone();

        self.retry_request(|| {
            let url = url.clone();
            let model = model.clone();
            let text = text.clone();
            let client = client.clone();

            async move {
                let request = EmbedRequest {
                    model,
                    prompt: text,
                };

                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::embedding(format!("embedding request failed: {e}")))?;

                if !response.status().is_success() {
                    return Err(Error::embedding(format!(
                        "embedding failed: HTTP {}",
                        response.status()
                    )));
                }

                let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                    Error::embedding(format!("failed to parse embedding response: {e}"))
                })?;

                Ok(embed_response.embedding)
            }
        })
        .await
    }

    /// Generate a completion with retry, returning text and token usage
    pub async fn generate(&self, prompt: &str) -> Result<Generation> {
        let url = format!("{}/api/generate", self.config.base_url);
        let model = self.config.generate_model.clone();
        let temperature = self.config.temperature;
        let prompt = prompt.to_string();
        let client = self.client.clone();

        tracing::info!("Generating answer with model: {}", model);

        self.retry_request(|| {
            let url = url.clone();
            let model = model.clone();
            let prompt = prompt.clone();
            let client = client.clone();

            async move {
                let request = GenerateRequest {
                    model,
                    prompt,
                    stream: false,
                    options: GenerateOptions { temperature },
                };

                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::generation(format!("generation request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::generation(format!(
                        "generation failed: HTTP {status} - {body}"
                    )));
                }

                let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                    Error::generation(format!("failed to parse generation response: {e}"))
                })?;

                Ok(Generation {
                    text: generate_response.response,
                    token_usage: generate_response.prompt_eval_count
                        + generate_response.eval_count,
                })
            }
        })
        .await
    }
}

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: std::sync::Arc<OllamaClient>,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: std::sync::Arc::new(OllamaClient::new(config)?),
            dimensions: config.embed_dimensions,
        })
    }

    /// Create from an existing client
    pub fn from_client(client: std::sync::Arc<OllamaClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: std::sync::Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: std::sync::Arc::new(OllamaClient::new(config)?),
            model: config.generate_model.clone(),
        })
    }

    /// Create from an existing client
    pub fn from_client(client: std::sync::Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.client.generate(prompt).await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
