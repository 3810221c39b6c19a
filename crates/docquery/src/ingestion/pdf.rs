//! PDF text extraction with per-page granularity

use crate::error::{Error, Result};
use crate::types::PageText;

/// Parse a PDF byte stream into ordered page texts (1-indexed).
///
/// Uses pdf-extract first; falls back to a direct lopdf content-stream walk
/// for documents pdf-extract cannot handle. A document from which no text
/// can be extracted at all is a parse failure, never a partial success.
pub fn parse_pdf(filename: &str, data: &[u8]) -> Result<Vec<PageText>> {
    let raw_pages = match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!("pdf-extract failed for {}: {}, trying fallback", filename, e);
            extract_pages_fallback(filename, data)?
        }
    };

    let pages: Vec<PageText> = raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, content)| PageText::new(i as u32 + 1, clean_text(&content), filename))
        .collect();

    if pages.is_empty() || pages.iter().all(|p| p.content.trim().is_empty()) {
        return Err(Error::file_parse(
            filename,
            "No text content could be extracted from PDF",
        ));
    }

    Ok(pages)
}

/// Strip null bytes and collapse blank-line noise from extracted text
fn clean_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fallback extraction walking each page's content stream with lopdf
fn extract_pages_fallback(filename: &str, data: &[u8]) -> Result<Vec<String>> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

    let mut pages = Vec::new();

    for (_page_num, page_id) in doc.get_pages() {
        match doc.get_page_content(page_id) {
            Ok(content) => pages.push(extract_text_from_content(&content)),
            Err(e) => {
                tracing::debug!("Could not get content for page {:?}: {}", page_id, e);
                pages.push(String::new());
            }
        }
    }

    if pages.iter().all(|p| p.trim().is_empty()) {
        return Err(Error::file_parse(
            filename,
            "PDF appears to be image-based or has no extractable text",
        ));
    }

    Ok(pages)
}

/// Extract text show operators from a PDF content stream
fn extract_text_from_content(content: &[u8]) -> String {
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;
    let mut current_text = String::new();

    for line in content_str.lines() {
        let line = line.trim();

        if line == "BT" {
            in_text_block = true;
            continue;
        }

        if line == "ET" {
            in_text_block = false;
            if !current_text.is_empty() {
                text.push_str(&current_text);
                text.push(' ');
                current_text.clear();
            }
            continue;
        }

        if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
            if let Some(start) = line.find('(') {
                if let Some(end) = line.rfind(')') {
                    let extracted = &line[start + 1..end];
                    let decoded = extracted
                        .replace("\\n", "\n")
                        .replace("\\r", "\r")
                        .replace("\\t", "\t")
                        .replace("\\(", "(")
                        .replace("\\)", ")")
                        .replace("\\\\", "\\");
                    current_text.push_str(&decoded);
                }
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_cleanly() {
        let err = parse_pdf("document.pdf", b"not a pdf at all").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse_pdf("document.pdf", b"").is_err());
    }

    #[test]
    fn test_clean_text_strips_noise() {
        let cleaned = clean_text("  line one  \n\n\0\n   \nline two ");
        assert_eq!(cleaned, "line one\nline two");
    }

    #[test]
    fn test_content_stream_extraction() {
        let stream = b"BT\n(Hello) Tj\n(World) Tj\nET\n";
        let text = extract_text_from_content(stream);
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
    }

    #[test]
    fn test_content_stream_escapes() {
        let stream = b"BT\n(a \\(b\\) c) Tj\nET\n";
        let text = extract_text_from_content(stream);
        assert!(text.contains("a (b) c"));
    }
}
