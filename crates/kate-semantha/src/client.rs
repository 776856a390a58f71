//! The service client trait and shared answer post-processing.

use async_trait::async_trait;

use kate_core::aggregate::SummarySource;
use kate_core::{Answer, Document, DocumentClass, LibraryEntry, Result};

/// Client interface to the semantha document-analysis platform.
///
/// All operations are read-only against the reference library. Implementors
/// must be shareable across concurrent dashboard requests.
#[async_trait]
pub trait SemanthaApi: Send + Sync {
    /// Compare an uploaded file against the reference library.
    ///
    /// Returns the analyzed document with one reference per paragraph at or
    /// above `threshold` (paragraphs without a match carry none).
    async fn compare_to_library(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        threshold: f64,
    ) -> Result<Document>;

    /// Text of one paragraph of a library document.
    async fn library_paragraph_text(&self, document_id: &str, paragraph_id: &str)
        -> Result<String>;

    /// Display name of a library document.
    async fn library_document_name(&self, document_id: &str) -> Result<String>;

    /// Direct plus derived tags of a library document.
    async fn library_document_tags(&self, document_id: &str) -> Result<Vec<String>>;

    /// Every tag in use across the reference library.
    async fn library_tags(&self) -> Result<Vec<String>>;

    /// Summaries of all library documents carrying the given tag.
    async fn library_entries_for_tag(&self, tag: &str) -> Result<Vec<LibraryEntry>>;

    /// Category assigned to a library document, if any.
    async fn document_category(&self, document_id: &str) -> Result<Option<DocumentClass>>;

    /// Resolve a category node by id, if it exists.
    async fn category_by_id(&self, category_id: &str) -> Result<Option<DocumentClass>>;

    /// Retrieval-augmented answer over the reference library.
    async fn answer(&self, question: &str) -> Result<Answer>;

    /// Topic summary generated from the given citation sources.
    async fn summarize(&self, sources: &[SummarySource], topic: &str) -> Result<String>;
}

/// Cut generated text at the earliest occurrence of any stop marker and trim
/// surrounding whitespace. Text without a marker is only trimmed.
pub fn truncate_at_stop_tokens(text: &str, tokens: &[&str]) -> String {
    let cut = tokens
        .iter()
        .filter_map(|token| text.find(token))
        .min()
        .unwrap_or(text.len());
    text[..cut].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kate_core::defaults::{ANSWER_STOP_TOKENS, SUMMARY_STOP_TOKENS};

    #[test]
    fn trait_is_object_safe() {
        fn assert_object_safe(_: &dyn SemanthaApi) {}
        let _ = assert_object_safe;
    }

    #[test]
    fn truncation_cuts_at_earliest_marker() {
        let text = "The answer.\n\nReferenzen:\n[1] a\nReferences:\n[2] b";
        assert_eq!(
            truncate_at_stop_tokens(text, &ANSWER_STOP_TOKENS),
            "The answer."
        );
    }

    #[test]
    fn truncation_without_marker_only_trims() {
        assert_eq!(
            truncate_at_stop_tokens("  plain answer \n", &ANSWER_STOP_TOKENS),
            "plain answer"
        );
    }

    #[test]
    fn summary_markers_ignore_localized_variants() {
        let text = "Summary text. Referenzen: stays";
        assert_eq!(
            truncate_at_stop_tokens(text, &SUMMARY_STOP_TOKENS),
            "Summary text. Referenzen: stays"
        );
    }
}
