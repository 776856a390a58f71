//! Mock stage store for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use kate_core::{Error, Result};

use crate::store::StageStore;

/// In-memory stage with a call log.
#[derive(Default)]
pub struct MockStage {
    calls: Mutex<Vec<String>>,
    failing: bool,
    files: Vec<(String, Bytes)>,
}

impl MockStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a storage error.
    pub fn with_failures(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Add a staged file with the given content.
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files
            .push((path.to_string(), Bytes::copy_from_slice(content)));
        self
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

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
            return Err(Error::Storage("mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StageStore for MockStage {
    async fn list_file_names(&self, limit: usize) -> Result<Vec<String>> {
        self.record(format!("list_file_names:{limit}"))?;
        Ok(self
            .files
            .iter()
            .take(limit)
            .map(|(path, _)| path.clone())
            .collect())
    }

    async fn fetch_document(&self, path: &str) -> Result<Bytes> {
        self.record(format!("fetch_document:{path}"))?;
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| Error::NotFound(format!("no staged file {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_respects_the_limit() {
        let stage = MockStage::new()
            .with_file("a.pdf", b"a")
            .with_file("b.pdf", b"b")
            .with_file("c.pdf", b"c");
        assert_eq!(stage.list_file_names(2).await.unwrap().len(), 2);
        assert_eq!(stage.call_count("list_file_names"), 1);
    }

    #[tokio::test]
    async fn fetching_an_unknown_path_is_not_found() {
        let stage = MockStage::new();
        match stage.fetch_document("missing.pdf").await {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_stage_still_records_calls() {
        let stage = MockStage::new().with_failures();
        assert!(stage.list_file_names(10).await.is_err());
        assert_eq!(stage.call_count("list_file_names"), 1);
    }
}
