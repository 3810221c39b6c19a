//! On-disk vector index with cosine similarity search
//!
//! The index is a serialized passage list loaded once at startup. Search is
//! a brute-force cosine scan, which is adequate for the corpus sizes this
//! service targets.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Passage;

/// Search result with passage and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved passage
    pub passage: Passage,
    /// Cosine similarity (0.0-1.0, higher is more similar)
    pub similarity: f32,
}

/// Vector index over embedded passages
pub struct VectorIndex {
    passages: RwLock<Vec<Passage>>,
    path: PathBuf,
    dimensions: usize,
}

impl VectorIndex {
    /// Load a prebuilt index from disk
    ///
    /// A missing file yields an empty index (nothing has been ingested yet);
    /// an unreadable or dimension-mismatched file is `IndexUnavailable`.
    pub fn load(path: impl AsRef<Path>, dimensions: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let passages: Vec<Passage> = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::IndexUnavailable(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                Error::IndexUnavailable(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            tracing::warn!("Index file {} not found, starting empty", path.display());
            Vec::new()
        };

        if let Some(p) = passages.iter().find(|p| p.embedding.len() != dimensions) {
            return Err(Error::IndexUnavailable(format!(
                "Passage {} has {} dimensions, expected {}",
                p.id,
                p.embedding.len(),
                dimensions
            )));
        }

        tracing::info!(
            "Loaded vector index from {} ({} passages)",
            path.display(),
            passages.len()
        );

        Ok(Self {
            passages: RwLock::new(passages),
            path,
            dimensions,
        })
    }

    /// Number of passages in the index
    pub fn len(&self) -> usize {
        self.passages.read().len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.passages.read().is_empty()
    }

    /// Embedding dimensions this index expects
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Append passages and persist the index to disk
    pub fn add(&self, new: Vec<Passage>) -> Result<()> {
        if let Some(p) = new.iter().find(|p| p.embedding.len() != self.dimensions) {
            return Err(Error::IndexUnavailable(format!(
                "Passage has {} dimensions, expected {}",
                p.embedding.len(),
                self.dimensions
            )));
        }

        let mut passages = self.passages.write();
        passages.extend(new);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&*passages)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }

    /// Search for the most similar passages, descending by similarity
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::IndexUnavailable(format!(
                "Query embedding has {} dimensions, index expects {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let passages = self.passages.read();
        let mut results: Vec<SearchResult> = passages
            .iter()
            .map(|p| SearchResult {
                passage: p.clone(),
                similarity: cosine_similarity(query_embedding, &p.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}

/// Cosine similarity between two vectors of equal length
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Passage;

    fn passage(content: &str, embedding: Vec<f32>) -> Passage {
        Passage::new(content.into(), embedding, "corpus.pdf".into(), Some(1), 0)
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::load(dir.path().join("index_store.json"), 3).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index_store.json");

        let index = VectorIndex::load(&path, 3).unwrap();
        index
            .add(vec![
                passage("alpha", vec![1.0, 0.0, 0.0]),
                passage("beta", vec![0.0, 1.0, 0.0]),
            ])
            .unwrap();

        let reloaded = VectorIndex::load(&path, 3).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::load(dir.path().join("index_store.json"), 3).unwrap();
        index
            .add(vec![
                passage("close", vec![0.9, 0.1, 0.0]),
                passage("exact", vec![1.0, 0.0, 0.0]),
                passage("far", vec![0.0, 0.0, 1.0]),
            ])
            .unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].passage.content, "exact");
        assert_eq!(results[1].passage.content, "close");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_dimension_mismatch_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::load(dir.path().join("index_store.json"), 3).unwrap();

        let err = index.search(&[1.0, 0.0], 5).unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));

        let err = index
            .add(vec![passage("bad", vec![1.0, 0.0])])
            .unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));
    }
}
