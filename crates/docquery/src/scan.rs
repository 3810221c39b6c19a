//! Literal query scanning over extracted page text
//!
//! Independent of semantic retrieval: a case-insensitive substring search
//! over the raw text of every page, aggregated per source file.

use serde::{Deserialize, Serialize};

use crate::types::{FileMatches, PageText};

/// How often a page may appear in the per-file match list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// A page contributes at most one entry per scanning pass
    OncePerPage,
    /// A page is appended once per occurrence of the query on it
    PerOccurrence,
}

/// Scan pages for literal occurrences of the query and aggregate per file.
///
/// Matching is case-insensitive (Unicode lowercasing on both sides). Entries
/// appear in scan order; an empty result is success, not an error.
pub fn scan_pages(pages: &[PageText], query: &str, policy: MatchPolicy) -> Vec<FileMatches> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<FileMatches> = Vec::new();

    for page in pages {
        let haystack = page.content.to_lowercase();
        let hits = match policy {
            MatchPolicy::OncePerPage => usize::from(haystack.contains(&needle)),
            MatchPolicy::PerOccurrence => count_occurrences(&haystack, &needle),
        };

        for _ in 0..hits {
            append_match(&mut matches, &page.filename, page.page_number);
        }
    }

    matches
}

/// Count non-overlapping occurrences of `needle` in `haystack`
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        count += 1;
        rest = &rest[pos + needle.len()..];
    }
    count
}

fn append_match(matches: &mut Vec<FileMatches>, filename: &str, page: u32) {
    match matches.iter_mut().find(|m| m.filename == filename) {
        Some(entry) => entry.pages.push(page),
        None => matches.push(FileMatches {
            filename: filename.to_string(),
            pages: vec![page],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(contents: &[&str]) -> Vec<PageText> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| PageText::new(i as u32 + 1, *c, "document.pdf"))
            .collect()
    }

    #[test]
    fn test_no_match_yields_empty() {
        let pages = pages(&["alpha beta", "gamma delta", "epsilon"]);
        let result = scan_pages(&pages, "nonexistent term", MatchPolicy::OncePerPage);
        assert!(result.is_empty());
    }

    #[test]
    fn test_match_records_page_once() {
        let pages = pages(&["cover page", "the invoice total is 40 EUR", "terms"]);
        let result = scan_pages(&pages, "invoice total", MatchPolicy::OncePerPage);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].filename, "document.pdf");
        assert_eq!(result[0].pages, vec![2]);
    }

    #[test]
    fn test_case_insensitive() {
        let pages = pages(&["INVOICE TOTAL: 40"]);
        let result = scan_pages(&pages, "Invoice Total", MatchPolicy::OncePerPage);
        assert_eq!(result[0].pages, vec![1]);
    }

    #[test]
    fn test_once_per_page_with_repeated_occurrences() {
        let pages = pages(&["total ... total ... total"]);
        let result = scan_pages(&pages, "total", MatchPolicy::OncePerPage);
        assert_eq!(result[0].pages, vec![1]);
    }

    #[test]
    fn test_per_occurrence_policy() {
        let pages = pages(&["total ... total", "nothing here", "total"]);
        let result = scan_pages(&pages, "total", MatchPolicy::PerOccurrence);
        assert_eq!(result[0].pages, vec![1, 1, 3]);
    }

    #[test]
    fn test_matches_across_multiple_files() {
        let pages = vec![
            PageText::new(1, "budget report", "a.pdf"),
            PageText::new(1, "annual budget", "b.pdf"),
            PageText::new(2, "budget detail", "a.pdf"),
        ];
        let result = scan_pages(&pages, "budget", MatchPolicy::OncePerPage);

        // Scan order preserved: a.pdf seen first
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].filename, "a.pdf");
        assert_eq!(result[0].pages, vec![1, 2]);
        assert_eq!(result[1].filename, "b.pdf");
        assert_eq!(result[1].pages, vec![1]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let pages = pages(&["anything"]);
        assert!(scan_pages(&pages, "", MatchPolicy::OncePerPage).is_empty());
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abcabc", "abc"), 2);
        assert_eq!(count_occurrences("abc", "xyz"), 0);
    }
}
