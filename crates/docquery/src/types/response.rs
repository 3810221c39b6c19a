//! Response types for query and index endpoints

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message returned when the literal scan finds nothing
pub const NO_MATCH_MESSAGE: &str = "No relevant documents found for the query.";

/// Literal match locations for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatches {
    /// Source filename
    pub filename: String,
    /// Matching page numbers in scan order (1-indexed)
    pub pages: Vec<u32>,
}

/// Response from a document query
///
/// The synthesized answer and the literal matches are separate fields, so no
/// reserved key can collide with a filename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// LLM-synthesized answer grounded in retrieved passages
    pub answer: String,
    /// Literal (case-insensitive) match locations, one entry per file
    pub matches: Vec<FileMatches>,
    /// Set when `matches` is empty; carries the no-match message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// ID of the persisted upload record
    pub upload_id: Uuid,
    /// Number of passages retrieved from the vector index
    pub chunks_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl QueryResponse {
    /// Build a response, attaching the no-match message when appropriate
    pub fn new(
        answer: String,
        matches: Vec<FileMatches>,
        upload_id: Uuid,
        chunks_retrieved: usize,
        processing_time_ms: u64,
    ) -> Self {
        let message = if matches.is_empty() {
            Some(NO_MATCH_MESSAGE.to_string())
        } else {
            None
        };

        Self {
            answer,
            matches,
            message,
            upload_id,
            chunks_retrieved,
            processing_time_ms,
        }
    }
}

/// Response from the index-build endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Indexed filename
    pub filename: String,
    /// Number of passages appended to the index
    pub passages_added: usize,
    /// Total passages in the index after this request
    pub index_size: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_message_set_only_when_empty() {
        let empty = QueryResponse::new("answer".into(), vec![], Uuid::new_v4(), 0, 10);
        assert_eq!(empty.message.as_deref(), Some(NO_MATCH_MESSAGE));

        let hit = QueryResponse::new(
            "answer".into(),
            vec![FileMatches {
                filename: "document.pdf".into(),
                pages: vec![2],
            }],
            Uuid::new_v4(),
            3,
            10,
        );
        assert!(hit.message.is_none());
    }

    #[test]
    fn test_answer_and_matches_are_distinct_fields() {
        // A file literally named "answer" cannot shadow the answer field
        let response = QueryResponse::new(
            "the total is 40".into(),
            vec![FileMatches {
                filename: "answer".into(),
                pages: vec![1],
            }],
            Uuid::new_v4(),
            1,
            5,
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["answer"], "the total is 40");
        assert_eq!(json["matches"][0]["filename"], "answer");
    }
}
