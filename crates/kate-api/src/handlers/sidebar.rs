//! Sidebar settings: strictness, tag filter, stage credentials.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use kate_core::defaults::NO_TAG;
use kate_core::{Error, StageCredentials, Strictness};

use crate::error::ApiResult;
use crate::state::{session_id, AppState};
use crate::views::{CredentialsView, StrictnessView, TagOptionsView};

#[derive(Debug, Deserialize)]
pub struct StrictnessRequest {
    pub level: Strictness,
}

/// Apply a comparison strictness level to the session threshold.
pub async fn set_strictness(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<StrictnessRequest>,
) -> ApiResult<Json<StrictnessView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    guard.apply_strictness(req.level);
    info!(
        level = %req.level,
        threshold = guard.similarity_threshold,
        "strictness changed"
    );
    Ok(Json(StrictnessView {
        level: req.level.to_string(),
        threshold: guard.similarity_threshold,
    }))
}

/// The tag filter options: every library tag plus the untagged sentinel.
pub async fn tag_options(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TagOptionsView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let selected = session.lock().await.selected_tags.clone();
    let mut options = state.semantha.library_tags().await?;
    options.push(NO_TAG.to_string());
    Ok(Json(TagOptionsView { options, selected }))
}

#[derive(Debug, Deserialize)]
pub struct TagFilterRequest {
    pub tags: Vec<String>,
}

/// Replace the session's tag filter.
pub async fn set_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TagFilterRequest>,
) -> ApiResult<Json<TagOptionsView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    session.lock().await.selected_tags = req.tags.clone();
    let mut options = state.semantha.library_tags().await?;
    options.push(NO_TAG.to_string());
    Ok(Json(TagOptionsView {
        options,
        selected: req.tags,
    }))
}

/// Store user-entered stage credentials.
///
/// Fields are trimmed; any non-empty submission switches the session off
/// the shared default account.
pub async fn set_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(credentials): Json<StageCredentials>,
) -> ApiResult<Json<CredentialsView>> {
    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    let credentials = credentials.trimmed();
    if credentials.is_any_set() {
        guard.default_credentials_enabled = false;
    }
    guard.stage_credentials = credentials;
    Ok(Json(CredentialsView {
        complete: guard.stage_credentials.is_complete(),
        default_credentials_enabled: guard.default_credentials_enabled,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DefaultCredentialsRequest {
    pub secret: String,
}

/// Unlock the shared default stage account with the configured secret.
pub async fn use_default_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DefaultCredentialsRequest>,
) -> ApiResult<Json<CredentialsView>> {
    let (Some(expected), Some(defaults)) = (&state.default_secret, &state.default_credentials)
    else {
        return Err(Error::InvalidInput("no default stage account is configured".to_string()).into());
    };
    if req.secret != *expected {
        return Err(Error::InvalidInput("incorrect secret".to_string()).into());
    }

    let session = state.sessions.session(&session_id(&headers)).await;
    let mut guard = session.lock().await;
    guard.stage_credentials = defaults.clone();
    guard.default_credentials_enabled = true;
    info!("default stage account enabled");
    Ok(Json(CredentialsView {
        complete: true,
        default_credentials_enabled: true,
    }))
}
