//! Read-through memoization for the semantha client.
//!
//! Platform responses are immutable for the lifetime of a dashboard session
//! (the reference library only changes out of band), so every operation is
//! memoized per exact argument set. Entries never expire; each per-operation
//! map is LRU-bounded instead.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::debug;

use kate_core::aggregate::SummarySource;
use kate_core::defaults::CACHE_CAPACITY;
use kate_core::{Answer, Document, DocumentClass, LibraryEntry, Result};

use crate::client::SemanthaApi;

/// One memoized operation: an LRU map from argument key to response.
struct Memo<V> {
    inner: Mutex<LruCache<String, V>>,
}

impl<V: Clone> Memo<V> {
    fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be non-zero");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().await.get(key).cloned()
    }

    async fn put(&self, key: String, value: V) {
        self.inner.lock().await.put(key, value);
    }
}

/// Wraps any [`SemanthaApi`] implementation with per-operation memoization.
pub struct CachedSemantha<S> {
    inner: Arc<S>,
    compare: Memo<Document>,
    paragraph_text: Memo<String>,
    document_name: Memo<String>,
    document_tags: Memo<Vec<String>>,
    all_tags: Memo<Vec<String>>,
    entries_for_tag: Memo<Vec<LibraryEntry>>,
    document_category: Memo<Option<DocumentClass>>,
    category_by_id: Memo<Option<DocumentClass>>,
    answers: Memo<Answer>,
    summaries: Memo<String>,
}

impl<S: SemanthaApi> CachedSemantha<S> {
    /// Wrap `inner` with the default per-operation capacity.
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, CACHE_CAPACITY)
    }

    /// Wrap `inner` with an explicit per-operation capacity.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner: Arc::new(inner),
            compare: Memo::new(capacity),
            paragraph_text: Memo::new(capacity),
            document_name: Memo::new(capacity),
            document_tags: Memo::new(capacity),
            all_tags: Memo::new(capacity),
            entries_for_tag: Memo::new(capacity),
            document_category: Memo::new(capacity),
            category_by_id: Memo::new(capacity),
            answers: Memo::new(capacity),
            summaries: Memo::new(capacity),
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Upload key: file name, content digest, and the exact threshold bits.
fn compare_key(file_name: &str, bytes: &[u8], threshold: f64) -> String {
    format!("{file_name}:{}:{:x}", sha256_hex(bytes), threshold.to_bits())
}

/// Summarization key: topic plus a digest over all source texts and origins.
fn summary_key(sources: &[SummarySource], topic: &str) -> String {
    let mut hasher = Sha256::new();
    for source in sources {
        hasher.update(source.document.as_bytes());
        hasher.update([0]);
        hasher.update(source.text.as_bytes());
        hasher.update([0]);
    }
    format!("{topic}:{}", hex::encode(hasher.finalize()))
}

#[async_trait]
impl<S: SemanthaApi> SemanthaApi for CachedSemantha<S> {
    async fn compare_to_library(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        threshold: f64,
    ) -> Result<Document> {
        let key = compare_key(file_name, &bytes, threshold);
        if let Some(doc) = self.compare.get(&key).await {
            debug!(op = "compare_to_library", document = %file_name, "cache hit");
            return Ok(doc);
        }
        let doc = self
            .inner
            .compare_to_library(file_name, bytes, threshold)
            .await?;
        self.compare.put(key, doc.clone()).await;
        Ok(doc)
    }

    async fn library_paragraph_text(
        &self,
        document_id: &str,
        paragraph_id: &str,
    ) -> Result<String> {
        let key = format!("{document_id}:{paragraph_id}");
        if let Some(text) = self.paragraph_text.get(&key).await {
            return Ok(text);
        }
        let text = self
            .inner
            .library_paragraph_text(document_id, paragraph_id)
            .await?;
        self.paragraph_text.put(key, text.clone()).await;
        Ok(text)
    }

    async fn library_document_name(&self, document_id: &str) -> Result<String> {
        if let Some(name) = self.document_name.get(document_id).await {
            return Ok(name);
        }
        let name = self.inner.library_document_name(document_id).await?;
        self.document_name
            .put(document_id.to_string(), name.clone())
            .await;
        Ok(name)
    }

    async fn library_document_tags(&self, document_id: &str) -> Result<Vec<String>> {
        if let Some(tags) = self.document_tags.get(document_id).await {
            return Ok(tags);
        }
        let tags = self.inner.library_document_tags(document_id).await?;
        self.document_tags
            .put(document_id.to_string(), tags.clone())
            .await;
        Ok(tags)
    }

    async fn library_tags(&self) -> Result<Vec<String>> {
        if let Some(tags) = self.all_tags.get("").await {
            return Ok(tags);
        }
        let tags = self.inner.library_tags().await?;
        self.all_tags.put(String::new(), tags.clone()).await;
        Ok(tags)
    }

    async fn library_entries_for_tag(&self, tag: &str) -> Result<Vec<LibraryEntry>> {
        if let Some(entries) = self.entries_for_tag.get(tag).await {
            return Ok(entries);
        }
        let entries = self.inner.library_entries_for_tag(tag).await?;
        self.entries_for_tag
            .put(tag.to_string(), entries.clone())
            .await;
        Ok(entries)
    }

    async fn document_category(&self, document_id: &str) -> Result<Option<DocumentClass>> {
        if let Some(category) = self.document_category.get(document_id).await {
            return Ok(category);
        }
        let category = self.inner.document_category(document_id).await?;
        self.document_category
            .put(document_id.to_string(), category.clone())
            .await;
        Ok(category)
    }

    async fn category_by_id(&self, category_id: &str) -> Result<Option<DocumentClass>> {
        if let Some(category) = self.category_by_id.get(category_id).await {
            return Ok(category);
        }
        let category = self.inner.category_by_id(category_id).await?;
        self.category_by_id
            .put(category_id.to_string(), category.clone())
            .await;
        Ok(category)
    }

    async fn answer(&self, question: &str) -> Result<Answer> {
        if let Some(answer) = self.answers.get(question).await {
            debug!(op = "answer", "cache hit");
            return Ok(answer);
        }
        let answer = self.inner.answer(question).await?;
        self.answers.put(question.to_string(), answer.clone()).await;
        Ok(answer)
    }

    async fn summarize(&self, sources: &[SummarySource], topic: &str) -> Result<String> {
        let key = summary_key(sources, topic);
        if let Some(summary) = self.summaries.get(&key).await {
            debug!(op = "summarize", tag = %topic, "cache hit");
            return Ok(summary);
        }
        let summary = self.inner.summarize(sources, topic).await?;
        self.summaries.put(key, summary.clone()).await;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSemantha;

    #[tokio::test]
    async fn repeated_compare_hits_the_cache() {
        let cached = CachedSemantha::new(MockSemantha::new());
        cached
            .compare_to_library("a.pdf", b"content".to_vec(), 0.7)
            .await
            .unwrap();
        cached
            .compare_to_library("a.pdf", b"content".to_vec(), 0.7)
            .await
            .unwrap();
        assert_eq!(cached.inner().call_count("compare_to_library"), 1);
    }

    #[tokio::test]
    async fn different_threshold_misses_the_cache() {
        let cached = CachedSemantha::new(MockSemantha::new());
        cached
            .compare_to_library("a.pdf", b"content".to_vec(), 0.70)
            .await
            .unwrap();
        cached
            .compare_to_library("a.pdf", b"content".to_vec(), 0.75)
            .await
            .unwrap();
        assert_eq!(cached.inner().call_count("compare_to_library"), 2);
    }

    #[tokio::test]
    async fn different_content_same_name_misses_the_cache() {
        let cached = CachedSemantha::new(MockSemantha::new());
        cached
            .compare_to_library("a.pdf", b"one".to_vec(), 0.7)
            .await
            .unwrap();
        cached
            .compare_to_library("a.pdf", b"two".to_vec(), 0.7)
            .await
            .unwrap();
        assert_eq!(cached.inner().call_count("compare_to_library"), 2);
    }

    #[tokio::test]
    async fn lookups_are_memoized_per_argument() {
        let mock = MockSemantha::new()
            .with_document_tags("lib1", vec!["Climate".to_string()])
            .with_document_tags("lib2", vec!["Social".to_string()]);
        let cached = CachedSemantha::new(mock);

        cached.library_document_tags("lib1").await.unwrap();
        cached.library_document_tags("lib1").await.unwrap();
        cached.library_document_tags("lib2").await.unwrap();
        assert_eq!(cached.inner().call_count("library_document_tags"), 2);
    }

    #[tokio::test]
    async fn none_category_is_cached_too() {
        let cached = CachedSemantha::new(MockSemantha::new());
        assert!(cached.document_category("lib1").await.unwrap().is_none());
        assert!(cached.document_category("lib1").await.unwrap().is_none());
        assert_eq!(cached.inner().call_count("document_category"), 1);
    }

    #[tokio::test]
    async fn answers_are_memoized_per_question() {
        let cached = CachedSemantha::new(MockSemantha::new().with_answer("Yes.", vec![]));
        cached.answer("Is it covered?").await.unwrap();
        cached.answer("Is it covered?").await.unwrap();
        cached.answer("Is it excluded?").await.unwrap();
        assert_eq!(cached.inner().call_count("answer"), 2);
    }

    #[tokio::test]
    async fn summaries_key_on_sources_and_topic() {
        let cached = CachedSemantha::new(MockSemantha::new().with_summary("Summary."));
        let sources = vec![SummarySource {
            text: "first".to_string(),
            document: "a.pdf".to_string(),
        }];
        cached.summarize(&sources, "Climate").await.unwrap();
        cached.summarize(&sources, "Climate").await.unwrap();
        cached.summarize(&sources, "Social").await.unwrap();
        assert_eq!(cached.inner().call_count("summarize"), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cached = CachedSemantha::new(MockSemantha::new().with_failures());
        assert!(cached.library_tags().await.is_err());
        assert!(cached.library_tags().await.is_err());
        assert_eq!(cached.inner().call_count("library_tags"), 2);
    }
}
