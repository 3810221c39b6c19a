//! Configuration for the document query service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scan::MatchPolicy;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Upload storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Literal scan configuration
    #[serde(default)]
    pub scan: ScanConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path of the prebuilt index file
    pub path: PathBuf,
    /// Number of passages to retrieve per query
    pub top_k: usize,
    /// Minimum cosine similarity for a passage to be used (0.0-1.0)
    pub similarity_threshold: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docquery")
            .join("index_store.json");

        Self {
            path,
            top_k: 5,
            similarity_threshold: 0.25,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub embed_dimensions: usize,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            generate_model: "phi3".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded files
    pub upload_dir: PathBuf,
    /// SQLite database path for the upload ledger
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docquery");

        Self {
            upload_dir: base.join("uploads"),
            database_path: base.join("uploads.db"),
        }
    }
}

/// Literal scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// How often a page may appear in the per-file match list
    pub match_policy: MatchPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::OncePerPage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.index.top_k, 5);
        assert_eq!(config.llm.embed_dimensions, 768);
        assert_eq!(config.scan.match_policy, MatchPolicy::OncePerPage);
    }

    #[test]
    fn test_load_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000
enable_cors = false
max_upload_size = 1048576

[scan]
match_policy = "per_occurrence"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.scan.match_policy, MatchPolicy::PerOccurrence);
        // Sections absent from the file fall back to defaults
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/config.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
