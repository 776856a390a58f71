//! Mock semantha client for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use kate_core::aggregate::SummarySource;
use kate_core::{Answer, AnswerReference, Document, DocumentClass, Error, LibraryEntry, Result};

use crate::client::SemanthaApi;

/// Canned-response client that records every call it receives.
///
/// Responses are configured with the `with_*` builders; unconfigured lookups
/// fall back to empty values. The call log makes cache-suppression and
/// handler-flow assertions possible.
#[derive(Default)]
pub struct MockSemantha {
    calls: Mutex<Vec<String>>,
    failing: bool,
    compare_result: Option<Document>,
    paragraph_texts: HashMap<(String, String), String>,
    document_names: HashMap<String, String>,
    document_tags: HashMap<String, Vec<String>>,
    all_tags: Vec<String>,
    entries_by_tag: HashMap<String, Vec<LibraryEntry>>,
    categories_by_document: HashMap<String, Option<DocumentClass>>,
    categories_by_id: HashMap<String, DocumentClass>,
    answer: Option<Answer>,
    summary: Option<String>,
}

impl MockSemantha {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a service error.
    pub fn with_failures(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Fixed result for every comparison.
    pub fn with_compare_result(mut self, document: Document) -> Self {
        self.compare_result = Some(document);
        self
    }

    pub fn with_paragraph_text(
        mut self,
        document_id: &str,
        paragraph_id: &str,
        text: &str,
    ) -> Self {
        self.paragraph_texts.insert(
            (document_id.to_string(), paragraph_id.to_string()),
            text.to_string(),
        );
        self
    }

    pub fn with_document_name(mut self, document_id: &str, name: &str) -> Self {
        self.document_names
            .insert(document_id.to_string(), name.to_string());
        self
    }

    pub fn with_document_tags(mut self, document_id: &str, tags: Vec<String>) -> Self {
        self.document_tags.insert(document_id.to_string(), tags);
        self
    }

    pub fn with_library_tags(mut self, tags: Vec<String>) -> Self {
        self.all_tags = tags;
        self
    }

    pub fn with_entries_for_tag(mut self, tag: &str, entries: Vec<LibraryEntry>) -> Self {
        self.entries_by_tag.insert(tag.to_string(), entries);
        self
    }

    pub fn with_document_category(
        mut self,
        document_id: &str,
        category: Option<DocumentClass>,
    ) -> Self {
        self.categories_by_document
            .insert(document_id.to_string(), category);
        self
    }

    pub fn with_category(mut self, category: DocumentClass) -> Self {
        self.categories_by_id.insert(category.id.clone(), category);
        self
    }

    pub fn with_answer(mut self, answer: &str, references: Vec<AnswerReference>) -> Self {
        self.answer = Some(Answer {
            answer: answer.to_string(),
            references,
        });
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose log entry starts with `op`.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.starts_with(op))
            .count()
    }

    fn record(&self, entry: String) -> Result<()> {
        self.calls.lock().unwrap().push(entry);
        if self.failing {
            return Err(Error::Service("mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SemanthaApi for MockSemantha {
    async fn compare_to_library(
        &self,
        file_name: &str,
        _bytes: Vec<u8>,
        threshold: f64,
    ) -> Result<Document> {
        self.record(format!("compare_to_library:{file_name}:{threshold}"))?;
        Ok(self.compare_result.clone().unwrap_or_else(|| Document {
            id: format!("mock-{file_name}"),
            name: file_name.to_string(),
            pages: Vec::new(),
        }))
    }

    async fn library_paragraph_text(
        &self,
        document_id: &str,
        paragraph_id: &str,
    ) -> Result<String> {
        self.record(format!(
            "library_paragraph_text:{document_id}:{paragraph_id}"
        ))?;
        Ok(self
            .paragraph_texts
            .get(&(document_id.to_string(), paragraph_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn library_document_name(&self, document_id: &str) -> Result<String> {
        self.record(format!("library_document_name:{document_id}"))?;
        Ok(self
            .document_names
            .get(document_id)
            .cloned()
            .unwrap_or_else(|| document_id.to_string()))
    }

    async fn library_document_tags(&self, document_id: &str) -> Result<Vec<String>> {
        self.record(format!("library_document_tags:{document_id}"))?;
        Ok(self
            .document_tags
            .get(document_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn library_tags(&self) -> Result<Vec<String>> {
        self.record("library_tags".to_string())?;
        Ok(self.all_tags.clone())
    }

    async fn library_entries_for_tag(&self, tag: &str) -> Result<Vec<LibraryEntry>> {
        self.record(format!("library_entries_for_tag:{tag}"))?;
        Ok(self.entries_by_tag.get(tag).cloned().unwrap_or_default())
    }

    async fn document_category(&self, document_id: &str) -> Result<Option<DocumentClass>> {
        self.record(format!("document_category:{document_id}"))?;
        Ok(self
            .categories_by_document
            .get(document_id)
            .cloned()
            .unwrap_or(None))
    }

    async fn category_by_id(&self, category_id: &str) -> Result<Option<DocumentClass>> {
        self.record(format!("category_by_id:{category_id}"))?;
        Ok(self.categories_by_id.get(category_id).cloned())
    }

    async fn answer(&self, question: &str) -> Result<Answer> {
        self.record(format!("answer:{question}"))?;
        Ok(self.answer.clone().unwrap_or_else(|| Answer {
            answer: String::new(),
            references: Vec::new(),
        }))
    }

    async fn summarize(&self, sources: &[SummarySource], topic: &str) -> Result<String> {
        self.record(format!("summarize:{topic}:{}", sources.len()))?;
        Ok(self.summary.clone().unwrap_or_default())
    }
}
