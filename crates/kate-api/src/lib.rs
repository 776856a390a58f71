//! # kate-api
//!
//! Dashboard HTTP backend for K-A-T-E One.
//!
//! One route group per dashboard page plus the sidebar settings routes.
//! Handlers read and mutate per-session state through the registry in
//! [`state`]; remote calls go through the shared semantha and stage clients.

pub mod error;
pub mod handlers;
pub mod state;
pub mod views;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/session/page", post(handlers::set_page))
        .route("/pages/howto", get(handlers::howto))
        .route("/pages/compare", get(handlers::compare::render))
        .route("/pages/compare/analyze", post(handlers::compare::analyze))
        .route("/pages/collection", get(handlers::collection::render))
        .route("/pages/collection/files", get(handlers::collection::list_files))
        .route(
            "/pages/collection/files/:name/preview",
            get(handlers::collection::preview_file),
        )
        .route("/pages/collection/analyze", post(handlers::collection::analyze))
        .route("/pages/collection/promote", post(handlers::collection::promote))
        .route(
            "/pages/collection/summarize",
            post(handlers::collection::summarize),
        )
        .route("/pages/qa/ask", post(handlers::qa::ask))
        .route("/settings/strictness", post(handlers::sidebar::set_strictness))
        .route(
            "/settings/tags",
            get(handlers::sidebar::tag_options).post(handlers::sidebar::set_tags),
        )
        .route("/settings/credentials", post(handlers::sidebar::set_credentials))
        .route(
            "/settings/credentials/default",
            post(handlers::sidebar::use_default_credentials),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
