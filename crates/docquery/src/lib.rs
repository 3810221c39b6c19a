//! # docquery
//!
//! A document question-answering service: upload a PDF with a query and get
//! back a model-generated answer grounded in a prebuilt vector index, plus
//! the exact pages where the query text literally appears.
//!
//! ## Features
//!
//! - **PDF extraction**: per-page text extraction with a raw content-stream
//!   fallback for documents the primary extractor rejects
//! - **Semantic retrieval**: cosine similarity search over an on-disk index
//!   of embedded passages
//! - **Answer generation**: Ollama-backed LLM answers grounded in retrieved
//!   passages
//! - **Literal scan**: case-insensitive substring search across every page,
//!   aggregated per file
//! - **Upload ledger**: every request's file and query persisted to SQLite
//!
//! ## Quick Start
//!
//! ```no_run
//! use docquery::{AppConfig, QueryServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let server = QueryServer::new(config)?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod scan;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use index::{SearchResult, VectorIndex};
pub use scan::{scan_pages, MatchPolicy};
pub use server::QueryServer;
pub use types::{FileMatches, PageText, Passage, QueryResponse, UploadRecord};
