//! HTTP implementation of the semantha client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use kate_core::aggregate::SummarySource;
use kate_core::defaults::{
    ANSWER_MAX_REFERENCES, ANSWER_SIMILARITY_THRESHOLD, ANSWER_STOP_TOKENS,
    COMPARE_MAX_REFERENCES, SUMMARY_STOP_TOKENS,
};
use kate_core::{
    Answer, AnswerReference, Document, DocumentClass, Error, LibraryEntry, Result,
};

use crate::client::{truncate_at_stop_tokens, SemanthaApi};
use crate::config::SemanthaConfig;

/// Timeout for platform requests (seconds). Document comparison of large
/// uploads dominates.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Reqwest-based semantha platform client.
pub struct SemanthaClient {
    client: Client,
    config: SemanthaConfig,
}

impl SemanthaClient {
    /// Create a client for the given platform connection.
    pub fn new(config: SemanthaConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            server_url = %config.server_url,
            domain = %config.domain,
            "Initializing semantha client"
        );

        Self { client, config }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SemanthaConfig::from_env()?))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/domains/{}/{}",
            self.config.server_url, self.config.domain, path
        )
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        Ok(resp)
    }
}

/// Library document metadata as returned by the platform.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentMeta {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    derived_tags: Vec<String>,
    #[serde(default)]
    document_class: Option<DocumentClass>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphBody {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryEntryWire {
    id: String,
    name: String,
    #[serde(default)]
    content_preview: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerWire {
    #[serde(default)]
    answer: String,
    #[serde(default)]
    references: Vec<AnswerReferenceWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerReferenceWire {
    document_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryWire {
    #[serde(default)]
    summary: String,
}

/// Surface a non-success response as a service error.
async fn expect_success(resp: Response, op: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        Err(Error::NotFound(format!("{op}: {body}")))
    } else {
        Err(Error::Service(format!("{op}: HTTP {status}: {body}")))
    }
}

#[async_trait]
impl SemanthaApi for SemanthaClient {
    async fn compare_to_library(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        threshold: f64,
    ) -> Result<Document> {
        debug!(
            document = %file_name,
            threshold = threshold,
            "comparing document against library"
        );
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("similaritythreshold", threshold.to_string())
            .text("maxreferences", COMPARE_MAX_REFERENCES.to_string());
        let resp = self
            .client
            .post(self.url("references"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let doc: Document = expect_success(resp, "compare_to_library")
            .await?
            .json()
            .await?;
        debug!(document = %file_name, page_count = doc.pages.len(), "comparison finished");
        Ok(doc)
    }

    async fn library_paragraph_text(
        &self,
        document_id: &str,
        paragraph_id: &str,
    ) -> Result<String> {
        let resp = self
            .get(&format!(
                "referencedocuments/{document_id}/paragraphs/{paragraph_id}"
            ))
            .await?;
        let body: ParagraphBody = expect_success(resp, "library_paragraph_text")
            .await?
            .json()
            .await?;
        Ok(body.text)
    }

    async fn library_document_name(&self, document_id: &str) -> Result<String> {
        let resp = self.get(&format!("referencedocuments/{document_id}")).await?;
        let meta: DocumentMeta = expect_success(resp, "library_document_name")
            .await?
            .json()
            .await?;
        Ok(meta.name)
    }

    async fn library_document_tags(&self, document_id: &str) -> Result<Vec<String>> {
        let resp = self.get(&format!("referencedocuments/{document_id}")).await?;
        let meta: DocumentMeta = expect_success(resp, "library_document_tags")
            .await?
            .json()
            .await?;
        // Direct tags first, then derived ones not already present
        let mut tags = meta.tags;
        for tag in meta.derived_tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    async fn library_tags(&self) -> Result<Vec<String>> {
        let resp = self.get("tags").await?;
        let tags: Vec<String> = expect_success(resp, "library_tags").await?.json().await?;
        Ok(tags)
    }

    async fn library_entries_for_tag(&self, tag: &str) -> Result<Vec<LibraryEntry>> {
        let resp = self
            .client
            .get(self.url("referencedocuments"))
            .bearer_auth(&self.config.api_key)
            .query(&[("tags", tag)])
            .send()
            .await?;
        let entries: Vec<LibraryEntryWire> = expect_success(resp, "library_entries_for_tag")
            .await?
            .json()
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| LibraryEntry {
                id: e.id,
                name: e.name,
                content_preview: e.content_preview.unwrap_or_default(),
            })
            .collect())
    }

    async fn document_category(&self, document_id: &str) -> Result<Option<DocumentClass>> {
        let resp = self.get(&format!("referencedocuments/{document_id}")).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let meta: DocumentMeta = expect_success(resp, "document_category")
            .await?
            .json()
            .await?;
        Ok(meta.document_class)
    }

    async fn category_by_id(&self, category_id: &str) -> Result<Option<DocumentClass>> {
        let resp = self.get(&format!("documentclasses/{category_id}")).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let class: DocumentClass = expect_success(resp, "category_by_id")
            .await?
            .json()
            .await?;
        Ok(Some(class))
    }

    async fn answer(&self, question: &str) -> Result<Answer> {
        debug!("requesting retrieval-augmented answer");
        let resp = self
            .client
            .post(self.url("answers"))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "question": question,
                "maxreferences": ANSWER_MAX_REFERENCES,
                "similaritythreshold": ANSWER_SIMILARITY_THRESHOLD,
            }))
            .send()
            .await?;
        let wire: AnswerWire = expect_success(resp, "answer").await?.json().await?;
        Ok(Answer {
            answer: truncate_at_stop_tokens(&wire.answer, &ANSWER_STOP_TOKENS),
            references: wire
                .references
                .into_iter()
                .map(|r| AnswerReference {
                    id: r.document_id,
                    name: r.name,
                    content: r.content.unwrap_or_default(),
                })
                .collect(),
        })
    }

    async fn summarize(&self, sources: &[SummarySource], topic: &str) -> Result<String> {
        debug!(
            tag = %topic,
            source_count = sources.len(),
            "requesting topic summary"
        );
        // 1-indexed source markers so the summary can cite its inputs
        let texts: Vec<String> = sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("[{}] {}", i + 1, source.text))
            .collect();
        let resp = self
            .client
            .post(self.url("summarizations"))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "topic": topic,
                "texts": texts,
            }))
            .send()
            .await?;
        let wire: SummaryWire = expect_success(resp, "summarize").await?.json().await?;
        Ok(truncate_at_stop_tokens(&wire.summary, &SUMMARY_STOP_TOKENS))
    }
}
