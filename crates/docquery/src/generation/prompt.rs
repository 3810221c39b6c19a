//! Prompt templates for retrieval-augmented generation

use crate::index::SearchResult;

/// Prompt builder for document queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results, labelling each passage with its source
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                result.passage.source_ref(),
                result.passage.content
            ));
        }

        context
    }

    /// Build the full RAG prompt with grounding instructions
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        if context.trim().is_empty() {
            return format!(
                r#"No supporting documents were retrieved for the question below.
State clearly that the indexed documents do not contain relevant information, then answer only if the question is answerable without document context.

QUESTION: {question}

ANSWER:"#
            );
        }

        format!(
            r#"You are a document-grounded assistant that ONLY uses information from provided documents.

RULES:
1. ONLY use information that is explicitly stated in the CONTEXT below
2. If the answer is not in the context, respond with "This information is not available in the provided documents."
3. Do NOT use external knowledge or make inferences beyond what is stated
4. When you reference specific information, name the source it came from

CONTEXT FROM DOCUMENTS:
{context}

QUESTION: {question}

Provide a grounded answer using ONLY the document content above:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Passage;

    #[test]
    fn test_context_labels_sources() {
        let results = vec![crate::index::SearchResult {
            passage: Passage::new(
                "The invoice total is 40 EUR.".into(),
                vec![0.0; 4],
                "document.pdf".into(),
                Some(2),
                0,
            ),
            similarity: 0.9,
        }];

        let context = PromptBuilder::build_context(&results);
        assert!(context.contains("[1] document.pdf, Page 2"));
        assert!(context.contains("The invoice total is 40 EUR."));
    }

    #[test]
    fn test_prompt_contains_question_and_context() {
        let prompt = PromptBuilder::build_rag_prompt("What is the total?", "some context");
        assert!(prompt.contains("What is the total?"));
        assert!(prompt.contains("some context"));
    }

    #[test]
    fn test_empty_context_prompt() {
        let prompt = PromptBuilder::build_rag_prompt("What is the total?", "  ");
        assert!(prompt.contains("No supporting documents"));
    }
}
