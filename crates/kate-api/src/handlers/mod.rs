//! Request handlers, one module per dashboard page.

pub mod collection;
pub mod compare;
pub mod qa;
pub mod sidebar;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use kate_core::{
    referenced_document_ids, CategoryIndex, Document, PageId, ParagraphMatch, Result, TagIndex,
};
use kate_semantha::SemanthaApi;

use crate::error::ApiResult;
use crate::state::{session_id, AppState};
use crate::views::PageView;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetPageRequest {
    pub page: PageId,
}

/// Navigation: the only writer of the session's active page.
pub async fn set_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SetPageRequest>,
) -> ApiResult<Json<PageView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    session.lock().await.page = req.page;
    info!(page = req.page.label(), "page changed");
    Ok(Json(PageView {
        page: req.page,
        label: req.page.label(),
    }))
}

/// Static how-to copy for the landing page.
pub async fn howto() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "How to use K-A-T-E One",
        "steps": [
            "Pick a comparison strictness in the sidebar; Medium fits most documents.",
            "On the Individual Document page, upload a PDF to compare it against the reference library.",
            "Review the matches, the topics-per-page chart, and the category sunburst; narrow them with the tag filter.",
            "On the Document Collection page, connect a document stage and analyze the staged files in one batch.",
            "Pick a topic with hits to generate a summary with source references.",
            "On the Semantic Q&A page, ask a free-text question against the reference library.",
        ],
    }))
}

/// Resolve the tag sets of every library document the analysis references.
pub(crate) async fn resolve_tag_index(
    semantha: &dyn SemanthaApi,
    document: &Document,
) -> Result<TagIndex> {
    let mut index = TagIndex::new();
    for doc_id in referenced_document_ids(document) {
        let tags = semantha.library_document_tags(&doc_id).await?;
        index.insert(doc_id, tags);
    }
    Ok(index)
}

/// Resolve the category chain of every match's top reference.
///
/// Parent links are walked remotely until the root; nodes already in the
/// index end the walk, which also bounds cyclic link data.
pub(crate) async fn resolve_category_index(
    semantha: &dyn SemanthaApi,
    matches: &[ParagraphMatch<'_>],
) -> Result<CategoryIndex> {
    let mut index = CategoryIndex::new();
    for m in matches {
        let doc_id = &m.top_reference().document_id;
        if index.contains_document(doc_id) {
            continue;
        }
        let category = semantha.document_category(doc_id).await?;
        if let Some(leaf) = &category {
            let mut parent = leaf.parent_id.clone();
            while let Some(parent_id) = parent {
                if index.contains_category(&parent_id) {
                    break;
                }
                match semantha.category_by_id(&parent_id).await? {
                    Some(node) => {
                        parent = node.parent_id.clone();
                        index.insert_category(node);
                    }
                    None => break,
                }
            }
        }
        index.insert_document_category(doc_id.clone(), category);
    }
    Ok(index)
}
