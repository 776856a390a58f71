//! Semantic Q&A page.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use kate_core::Error;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::views::{AnswerRow, AnswerView};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Answer a free-text question against the reference library.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AnswerView>> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("question must not be empty".to_string()).into());
    }

    let answer = state.semantha.answer(question).await?;
    info!(result_count = answer.references.len(), "question answered");

    let mut references = Vec::with_capacity(answer.references.len());
    for reference in answer.references {
        let tag = state
            .semantha
            .library_document_tags(&reference.id)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();
        references.push(AnswerRow {
            name: reference.name,
            tag,
            content: reference.content,
        });
    }

    Ok(Json(AnswerView {
        answer: answer.answer,
        references,
    }))
}
