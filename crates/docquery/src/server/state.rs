//! Application state for the query server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaClient, OllamaEmbedder, OllamaLlm};
use crate::storage::UploadStore;

/// Shared application state
///
/// All collaborators are constructed once at startup and shared across
/// requests; handlers never build their own clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
    /// Prebuilt vector index
    index: Arc<VectorIndex>,
    /// Upload ledger
    uploads: Arc<UploadStore>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state with Ollama-backed providers
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let client = Arc::new(OllamaClient::new(&config.llm)?);
        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(
            OllamaEmbedder::from_client(Arc::clone(&client), config.llm.embed_dimensions),
        );
        let llm_provider: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::from_client(
            client,
            config.llm.generate_model.clone(),
        ));
        tracing::info!(
            "Ollama providers initialized (embed: {}, generate: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        let index = Arc::new(VectorIndex::load(
            &config.index.path,
            config.llm.embed_dimensions,
        )?);

        let uploads = Arc::new(UploadStore::open(&config.storage)?);
        tracing::info!("Upload store opened at {}", config.storage.upload_dir.display());

        Ok(Self::from_parts(
            config,
            embedding_provider,
            llm_provider,
            index,
            uploads,
        ))
    }

    /// Assemble state from already-built collaborators (used by tests)
    pub fn from_parts(
        config: AppConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        index: Arc<VectorIndex>,
        uploads: Arc<UploadStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
                index,
                uploads,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get the vector index
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.inner.index
    }

    /// Get the upload store
    pub fn uploads(&self) -> &Arc<UploadStore> {
        &self.inner.uploads
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
