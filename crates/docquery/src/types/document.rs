//! Document, passage, and upload record types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text content of a single page from an uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Extracted text content
    pub content: String,
    /// Originating file name as uploaded
    pub filename: String,
}

impl PageText {
    pub fn new(page_number: u32, content: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
            filename: filename.into(),
        }
    }
}

/// A text chunk stored in the vector index, with provenance for citations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Unique passage ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// Source filename
    pub filename: String,
    /// Page number within the source document (1-indexed)
    pub page_number: Option<u32>,
    /// Chunk index within the source document
    pub chunk_index: u32,
}

impl Passage {
    pub fn new(
        content: String,
        embedding: Vec<f32>,
        filename: String,
        page_number: Option<u32>,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            embedding,
            filename,
            page_number,
            chunk_index,
        }
    }

    /// Format provenance for prompt context
    pub fn source_ref(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}

/// A persisted upload: file plus the query it arrived with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Unique upload ID
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Path where the file bytes were stored
    pub stored_path: String,
    /// Query text submitted with the file
    pub query: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// SHA-256 of the file content
    pub content_hash: String,
    /// Upload timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ref() {
        let with_page = Passage::new(
            "text".into(),
            vec![0.0; 4],
            "report.pdf".into(),
            Some(3),
            0,
        );
        assert_eq!(with_page.source_ref(), "report.pdf, Page 3");

        let without_page = Passage::new("text".into(), vec![0.0; 4], "notes.pdf".into(), None, 1);
        assert_eq!(without_page.source_ref(), "notes.pdf");
    }
}
