//! Individual Document page: upload, analysis, and the comparison view.

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

use kate_core::defaults::SUNBURST_TEXT_LIMIT;
use kate_core::{
    paragraph_matches, referenced_document_ids, split_by_match, sunburst_breadcrumbs,
    topic_counts_per_page, Error, SessionState,
};

use crate::error::{ApiError, ApiResult};
use crate::handlers::{resolve_category_index, resolve_tag_index};
use crate::state::{session_id, AppState};
use crate::views::{similarity_color, similarity_percent, CompareView, MatchRow, TagCoverageView};

/// Built-in demonstration document for users without a file at hand.
const SAMPLE_NAME: &str = "sample_supplier_code.txt";
const SAMPLE_DOCUMENT: &str = "\
Our suppliers commit to reducing greenhouse gas emissions across their \
operations and to reporting progress annually.\n\n\
Working conditions must meet recognized labor standards, including freedom \
of association and the exclusion of forced and child labor.\n\n\
Suppliers maintain an anti-corruption program and disclose conflicts of \
interest to the procurement organization.\n";

/// Analyze an uploaded file (or the built-in sample) against the library at
/// the session's similarity threshold, store the result, and render the page.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<CompareView>> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("malformed upload: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidInput(format!("malformed upload: {e}")))?;
                upload = Some((name, bytes.to_vec()));
            }
            Some("sample") => {
                upload = Some((SAMPLE_NAME.to_string(), SAMPLE_DOCUMENT.as_bytes().to_vec()));
            }
            _ => {}
        }
    }
    let (name, bytes) =
        upload.ok_or_else(|| Error::InvalidInput("no file uploaded".to_string()))?;

    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    let document = state
        .semantha
        .compare_to_library(&name, bytes, guard.similarity_threshold)
        .await?;
    info!(
        document = %name,
        match_count = paragraph_matches(&document).len(),
        "document analyzed"
    );
    guard.set_single_document(name, document);
    let view = build_view(&state, &guard).await?;
    Ok(Json(view))
}

/// Re-render the comparison page from session state.
pub async fn render(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<CompareView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let guard = session.lock().await;
    let view = build_view(&state, &guard).await?;
    Ok(Json(view))
}

async fn build_view(state: &AppState, session: &SessionState) -> Result<CompareView, ApiError> {
    let Some((name, document)) = &session.single_document else {
        return Ok(CompareView::empty());
    };
    let semantha = state.semantha.as_ref();
    let selected = &session.selected_tags;

    let matches = paragraph_matches(document);
    let tag_index = resolve_tag_index(semantha, document).await?;
    let category_index = resolve_category_index(semantha, &matches).await?;

    let topics = topic_counts_per_page(document, &tag_index, selected);

    // Coverage is shown per selected tag, or across the whole library when
    // no filter is active.
    let referenced = referenced_document_ids(document);
    let coverage_tags = if selected.is_empty() {
        semantha.library_tags().await?
    } else {
        selected.clone()
    };
    let mut coverage = Vec::with_capacity(coverage_tags.len());
    for tag in coverage_tags {
        let entries = semantha.library_entries_for_tag(&tag).await?;
        let split = split_by_match(&entries, &referenced);
        coverage.push(TagCoverageView {
            tag,
            matched: split.matched,
            not_matched: split.not_matched,
        });
    }

    let sunburst = sunburst_breadcrumbs(
        &matches,
        &tag_index,
        &category_index,
        selected,
        SUNBURST_TEXT_LIMIT,
    );

    let mut rows = Vec::new();
    for m in &matches {
        let top = m.top_reference();
        let tags = tag_index.tags_or_sentinel(&top.document_id);
        if !selected.is_empty() && !tags.iter().any(|t| selected.contains(t)) {
            continue;
        }
        let library_text = semantha
            .library_paragraph_text(&top.document_id, &top.paragraph_id)
            .await?;
        let library_document = semantha.library_document_name(&top.document_id).await?;
        rows.push(MatchRow {
            input_text: m.paragraph.text.clone(),
            similarity_percent: similarity_percent(top.similarity),
            color: similarity_color(top.similarity),
            library_document,
            library_text,
            tags,
        });
    }

    Ok(CompareView {
        analyzed: true,
        document: Some(name.clone()),
        match_count: matches.len(),
        page_count: document.pages.len(),
        topics,
        coverage,
        sunburst,
        matches: rows,
    })
}
