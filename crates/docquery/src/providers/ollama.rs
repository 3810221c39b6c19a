//! Ollama client and providers with timeout and retry handling

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama API client with automatic retry
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
    max_retries: u32,
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

impl OllamaClient {
    /// Create a new Ollama client
    ///
    /// The HTTP client carries the configured deadline, so a stalled Ollama
    /// call fails with `Timeout` instead of blocking the request forever.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

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
                Err(e @ Error::Timeout(_)) => return Err(e),
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

        Err(last_error.unwrap_or_else(|| Error::Llm("Unknown error".to_string())))
    }

    fn classify(err: reqwest::Error, what: &str) -> Error {
        if err.is_timeout() {
            Error::Timeout(what.to_string())
        } else {
            Error::Http(err)
        }
    }

    /// Check if Ollama is available
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

        self.retry_request(|| async {
            let request = EmbedRequest {
                model: self.config.embed_model.clone(),
                prompt: text.to_string(),
            };

            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| Self::classify(e, "ollama embeddings"))?;

            if !response.status().is_success() {
                return Err(Error::Embedding(format!(
                    "Ollama returned {}",
                    response.status()
                )));
            }

            let body: EmbedResponse = response
                .json()
                .await
                .map_err(|e| Error::Embedding(format!("Malformed embedding response: {}", e)))?;

            if body.embedding.is_empty() {
                return Err(Error::Embedding("Empty embedding returned".to_string()));
            }

            Ok(body.embedding)
        })
        .await
    }

    /// Generate an answer for a question over retrieved context, with retry
    pub async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_rag_prompt(question, context);
        let url = format!("{}/api/generate", self.config.base_url);

        self.retry_request(|| async {
            let request = GenerateRequest {
                model: self.config.generate_model.clone(),
                prompt: prompt.clone(),
                stream: false,
                options: GenerateOptions {
                    temperature: self.config.temperature,
                },
            };

            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| Self::classify(e, "ollama generate"))?;

            if !response.status().is_success() {
                return Err(Error::Llm(format!("Ollama returned {}", response.status())));
            }

            let body: GenerateResponse = response
                .json()
                .await
                .map_err(|e| Error::Llm(format!("Malformed generate response: {}", e)))?;

            let answer = body.response.trim().to_string();
            if answer.is_empty() {
                return Err(Error::Llm("Empty answer returned".to_string()));
            }

            Ok(answer)
        })
        .await
    }
}

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn from_client(client: Arc<OllamaClient>, dimensions: usize) -> Self {
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

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    pub fn from_client(client: Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        self.client.generate_answer(question, context).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
