//! Per-session dashboard state.
//!
//! One `SessionState` exists per user session and owns every entity instance
//! for the session's lifetime. All defaults are set up front by the
//! constructor; `reset_*` operations restore the documented default for
//! their slot and are idempotent. View handlers borrow the state to render
//! and never persist it elsewhere.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::models::{BatchAnnotations, Document, StageCredentials};

/// The four mutually exclusive dashboard pages.
///
/// Navigation input is the only writer of the active page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    #[default]
    HowTo,
    IndividualDocument,
    DocumentCollection,
    QuestionAnswer,
}

impl PageId {
    /// Human-readable menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HowTo => "How To",
            Self::IndividualDocument => "Individual Document",
            Self::DocumentCollection => "Document Collection",
            Self::QuestionAnswer => "Semantic Q&A",
        }
    }
}

/// Named strictness levels for library comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Strict,
    #[default]
    Medium,
    Relaxed,
}

impl Strictness {
    /// Similarity cutoff this level maps to.
    pub fn threshold(&self) -> f64 {
        match self {
            Self::Strict => defaults::THRESHOLD_STRICT,
            Self::Medium => defaults::THRESHOLD_MEDIUM,
            Self::Relaxed => defaults::THRESHOLD_RELAXED,
        }
    }

    /// Parse a level from its display name (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "medium" => Some(Self::Medium),
            "relaxed" => Some(Self::Relaxed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Medium => write!(f, "Medium"),
            Self::Relaxed => write!(f, "Relaxed"),
        }
    }
}

/// The complete per-session context object.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Active dashboard page.
    pub page: PageId,
    /// Similarity cutoff for comparisons. Stays 0.0 until the comparison
    /// sidebar is first rendered, which applies the default Medium level.
    pub similarity_threshold: f64,
    /// Tags selected in the comparison filter sidebar. Empty = no filtering.
    pub selected_tags: Vec<String>,
    /// The single-document analysis result: (file name, analyzed document).
    pub single_document: Option<(String, Document)>,
    /// Documents accumulated by the latest batch analysis.
    pub batch_documents: Vec<Document>,
    /// Per-document paragraph annotations from the latest batch analysis.
    pub batch_annotations: BatchAnnotations,
    /// Topic selected for summarization on the collection page.
    pub summary_tag: Option<String>,
    /// Remote stage credentials entered in the sidebar.
    pub stage_credentials: StageCredentials,
    /// Whether the shared default stage account is active.
    pub default_credentials_enabled: bool,
}

impl SessionState {
    /// Create a session with every slot at its documented default.
    pub fn new() -> Self {
        Self {
            default_credentials_enabled: true,
            ..Self::default()
        }
    }

    /// Store the single-document analysis result.
    pub fn set_single_document(&mut self, name: impl Into<String>, document: Document) {
        self.single_document = Some((name.into(), document));
    }

    /// Clear the single-document analysis result.
    pub fn reset_single_document(&mut self) {
        self.single_document = None;
    }

    /// Append a document to the current batch.
    pub fn add_batch_document(&mut self, document: Document) {
        self.batch_documents.push(document);
    }

    /// Clear all batch analysis results. Called when a new batch analysis
    /// starts.
    pub fn reset_batch(&mut self) {
        self.batch_documents.clear();
        self.batch_annotations.clear();
        self.summary_tag = None;
    }

    /// Apply a strictness level to the similarity threshold.
    pub fn apply_strictness(&mut self, level: Strictness) {
        self.similarity_threshold = level.threshold();
    }
}
