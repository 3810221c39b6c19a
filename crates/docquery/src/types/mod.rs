//! Core types for the document query service

pub mod document;
pub mod response;

pub use document::{PageText, Passage, UploadRecord};
pub use response::{FileMatches, IndexResponse, QueryResponse, NO_MATCH_MESSAGE};
