//! # kate-core
//!
//! Core types, session state, and result aggregation for K-A-T-E One.
//!
//! This crate provides the domain model shared by the service clients and
//! the dashboard API: the semantha document/reference graph, the per-session
//! context object, and the pure transforms that turn raw analysis results
//! into display-ready structures.

pub mod aggregate;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod text;

// Re-export commonly used types at crate root
pub use aggregate::{
    batch_tag_counts, paragraph_matches, referenced_document_ids, split_by_match,
    summary_sources, sunburst_breadcrumbs, topic_counts_per_page, Breadcrumbs, CategoryIndex,
    PageTopicCount, ParagraphMatch, SummarySource, TagCoverage, TagIndex,
};
pub use error::{Error, Result};
pub use models::{
    Answer, AnswerReference, BatchAnnotations, Content, Document, DocumentClass, LibraryEntry,
    Page, Paragraph, ParagraphAnnotation, Reference, StageCredentials,
};
pub use session::{PageId, SessionState, Strictness};
pub use text::short_text;
