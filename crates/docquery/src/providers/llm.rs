//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer given a question and retrieved context
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
