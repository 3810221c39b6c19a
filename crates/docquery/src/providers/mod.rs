//! Provider abstractions for embeddings and answer generation
//!
//! Trait seams allow swapping the Ollama backend for another service and
//! keep request handlers testable without a live model server.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
