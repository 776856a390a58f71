//! Document Collection page: stage listing, batch analysis, summarization.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use kate_core::defaults::{MAX_STAGE_FETCH, MAX_STAGE_FILES, NO_TAG, TAG_LABEL_LIMIT};
use kate_core::{
    batch_tag_counts, paragraph_matches, short_text, summary_sources, Error, PageId,
    ParagraphAnnotation,
};
use kate_stage::{to_base64, StageFile};

use crate::error::ApiResult;
use crate::state::{session_id, AppState};
use crate::views::{
    BatchResultView, CollectionView, DocumentTagsView, FileListingView, FilePreviewView,
    PageView, SourceRow, StageFileView, SummaryView, TagCountView,
};

/// Credential-gated stage listing with viewability/analyzability flags.
pub async fn list_files(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<FileListingView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let guard = session.lock().await;
    let stage = state.stage_for(&guard)?;
    drop(guard);

    let paths = stage.list_file_names(MAX_STAGE_FETCH).await?;
    let files: Vec<StageFileView> = paths
        .into_iter()
        .map(|path| {
            let file = StageFile::new(&path);
            StageFileView {
                name: file.name().to_string(),
                viewable: file.is_viewable(),
                analyzable: file.is_analyzable(),
                path,
            }
        })
        .collect();
    let analyzable_count = files
        .iter()
        .filter(|f| f.analyzable)
        .take(MAX_STAGE_FILES)
        .count();
    Ok(Json(FileListingView {
        files,
        analyzable_count,
    }))
}

/// Inline preview of one staged PDF as base64.
pub async fn preview_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<FilePreviewView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let guard = session.lock().await;
    let stage = state.stage_for(&guard)?;
    drop(guard);

    let file = StageFile::new(&name);
    if !file.is_viewable() {
        return Err(Error::InvalidInput(format!("{name} cannot be previewed")).into());
    }
    let bytes = stage.fetch_document(file.path()).await?;
    Ok(Json(FilePreviewView {
        name: file.name().to_string(),
        content_base64: to_base64(&bytes),
    }))
}

/// Batch-analyze the analyzable stage files at the session threshold.
///
/// Resets the previous batch first; per document, each paragraph match is
/// annotated with its top reference and the referenced library document's
/// first tag.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<BatchResultView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    let stage = state.stage_for(&guard)?;

    let paths = stage.list_file_names(MAX_STAGE_FETCH).await?;
    let files: Vec<StageFile> = paths
        .into_iter()
        .map(StageFile::new)
        .filter(StageFile::is_analyzable)
        .take(MAX_STAGE_FILES)
        .collect();

    guard.reset_batch();
    let mut names = Vec::with_capacity(files.len());
    for file in &files {
        let bytes = stage.fetch_document(file.path()).await?;
        let document = state
            .semantha
            .compare_to_library(file.name(), bytes.to_vec(), guard.similarity_threshold)
            .await?;

        let mut annotations = Vec::new();
        for m in paragraph_matches(&document) {
            let top = m.top_reference().clone();
            let tag = state
                .semantha
                .library_document_tags(&top.document_id)
                .await?
                .into_iter()
                .next()
                .unwrap_or_else(|| NO_TAG.to_string());
            annotations.push(ParagraphAnnotation {
                paragraph_id: m.paragraph.id.clone(),
                reference: top,
                tag,
            });
        }
        info!(
            document = %file.name(),
            match_count = annotations.len(),
            "batch document analyzed"
        );
        names.push(file.name().to_string());
        guard
            .batch_annotations
            .insert(file.name().to_string(), annotations);
        guard.add_batch_document(document);
    }

    Ok(Json(BatchResultView {
        analyzed_count: names.len(),
        documents: names,
    }))
}

/// Collection overview: topic hit counts and per-document tag lists.
pub async fn render(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<CollectionView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let guard = session.lock().await;

    let topic_counts = batch_tag_counts(&guard.batch_annotations)
        .into_iter()
        .map(|(tag, count)| TagCountView {
            label: short_text(&tag, TAG_LABEL_LIMIT),
            tag,
            count,
        })
        .collect();

    let documents = guard
        .batch_annotations
        .iter()
        .map(|(name, annotations)| {
            let mut tags: Vec<String> = Vec::new();
            for ann in annotations {
                if !tags.contains(&ann.tag) {
                    tags.push(ann.tag.clone());
                }
            }
            DocumentTagsView {
                name: name.clone(),
                tags,
            }
        })
        .collect();

    Ok(Json(CollectionView {
        analyzed: !guard.batch_documents.is_empty(),
        topic_counts,
        documents,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    pub document: String,
}

/// Promote one batch document into the single-document slot and switch to
/// the Individual Document page.
pub async fn promote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PromoteRequest>,
) -> ApiResult<Json<PageView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    let document = guard
        .batch_documents
        .iter()
        .find(|d| d.name == req.document)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("{} is not in the batch", req.document)))?;
    guard.set_single_document(req.document, document);
    guard.page = PageId::IndividualDocument;
    Ok(Json(PageView {
        page: PageId::IndividualDocument,
        label: PageId::IndividualDocument.label(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub tag: String,
}

/// Summarize one topic across the batch. A topic without sources yields an
/// informational payload, not an error.
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SummarizeRequest>,
) -> ApiResult<Json<SummaryView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    guard.summary_tag = Some(req.tag.clone());

    let sources = summary_sources(&req.tag, &guard.batch_annotations, &guard.batch_documents);
    if sources.is_empty() {
        return Ok(Json(SummaryView {
            tag: req.tag,
            summary: None,
            sources: Vec::new(),
        }));
    }

    let summary = state.semantha.summarize(&sources, &req.tag).await?;
    let rows = sources
        .iter()
        .enumerate()
        .map(|(i, source)| SourceRow {
            index: i + 1,
            document: source.document.clone(),
        })
        .collect();
    Ok(Json(SummaryView {
        tag: req.tag,
        summary: Some(summary),
        sources: rows,
    }))
}
