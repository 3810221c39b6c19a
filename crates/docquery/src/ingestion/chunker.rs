//! Sentence-aware text chunking with page tracking

use unicode_segmentation::UnicodeSegmentation;

use crate::types::PageText;

/// A chunk of page text ready for embedding
#[derive(Debug, Clone)]
pub struct PageChunk {
    /// Text content
    pub content: String,
    /// Page the chunk came from (1-indexed)
    pub page_number: u32,
    /// Chunk index within the document
    pub chunk_index: u32,
}

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
    /// Minimum chunk size (smaller chunks are skipped)
    min_size: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1024, 200)
    }
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size: 50,
        }
    }

    /// Chunk the pages of a document, respecting sentence boundaries
    pub fn chunk_pages(&self, pages: &[PageText]) -> Vec<PageChunk> {
        let mut chunks = Vec::new();

        for page in pages {
            self.chunk_page(page, &mut chunks);
        }

        chunks
    }

    fn chunk_page(&self, page: &PageText, chunks: &mut Vec<PageChunk>) {
        let mut current = String::new();

        for sentence in page.content.unicode_sentences() {
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                self.push_chunk(&current, page.page_number, chunks);
                current = self.carry_overlap(&current);
            }

            if !current.is_empty() && !current.ends_with(char::is_whitespace) {
                current.push(' ');
            }
            current.push_str(sentence.trim());
        }

        self.push_chunk(&current, page.page_number, chunks);
    }

    fn push_chunk(&self, content: &str, page_number: u32, chunks: &mut Vec<PageChunk>) {
        let trimmed = content.trim();
        if trimmed.len() >= self.min_size {
            chunks.push(PageChunk {
                content: trimmed.to_string(),
                page_number,
                chunk_index: chunks.len() as u32,
            });
        }
    }

    /// Tail of the previous chunk carried into the next one for continuity
    fn carry_overlap(&self, chunk: &str) -> String {
        if self.overlap == 0 || chunk.len() <= self.overlap {
            return String::new();
        }

        let mut start = chunk.len() - self.overlap;
        while start < chunk.len() && !chunk.is_char_boundary(start) {
            start += 1;
        }
        chunk[start..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> PageText {
        PageText::new(1, content, "document.pdf")
    }

    #[test]
    fn test_short_page_single_chunk() {
        let chunker = TextChunker::new(200, 20);
        let text = "This is a sentence long enough to clear the minimum chunk size limit.";
        let chunks = chunker.chunk_pages(&[page(text)]);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].page_number, 1);
        assert_eq!(chunks[0].content, text);
    }

    #[test]
    fn test_long_text_splits_with_overlap() {
        let chunker = TextChunker::new(120, 30);
        let sentence = "The quick brown fox jumps over the lazy dog near the river bank. ";
        let text = sentence.repeat(6);
        let chunks = chunker.chunk_pages(&[page(&text)]);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Target size plus one carried sentence of slack
            assert!(chunk.content.len() <= 120 + sentence.len());
        }
        // Indices are sequential
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
        }
    }

    #[test]
    fn test_tiny_fragments_skipped() {
        let chunker = TextChunker::new(200, 20);
        let chunks = chunker.chunk_pages(&[page("Too short.")]);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_page_numbers_preserved() {
        let chunker = TextChunker::new(200, 20);
        let pages = vec![
            PageText::new(1, "First page with a sentence long enough to keep around here.", "a.pdf"),
            PageText::new(2, "Second page with a sentence long enough to keep around too.", "a.pdf"),
        ];
        let chunks = chunker.chunk_pages(&pages);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page_number, 1);
        assert_eq!(chunks[1].page_number, 2);
    }
}
