//! PDF parsing and chunking

mod chunker;
mod pdf;

pub use chunker::{PageChunk, TextChunker};
pub use pdf::parse_pdf;
