//! Display-ready view models.
//!
//! Charts are delivered as plain arrays/rows; drawing is the frontend's
//! concern.

use serde::Serialize;

use kate_core::defaults::{
    HIGH_SIMILARITY, HIGH_SIMILARITY_COLOR, LOW_SIMILARITY_COLOR, MID_SIMILARITY,
    MID_SIMILARITY_COLOR,
};
use kate_core::{Breadcrumbs, LibraryEntry, PageId, PageTopicCount};

/// Display color for a similarity score.
pub fn similarity_color(similarity: f64) -> &'static str {
    if similarity > HIGH_SIMILARITY {
        HIGH_SIMILARITY_COLOR
    } else if similarity > MID_SIMILARITY {
        MID_SIMILARITY_COLOR
    } else {
        LOW_SIMILARITY_COLOR
    }
}

/// Similarity rendered as a whole percentage.
pub fn similarity_percent(similarity: f64) -> String {
    format!("{:.0}%", similarity * 100.0)
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: PageId,
    pub label: &'static str,
}

/// Everything the comparison page renders.
#[derive(Debug, Serialize)]
pub struct CompareView {
    pub analyzed: bool,
    pub document: Option<String>,
    pub match_count: usize,
    pub page_count: usize,
    pub topics: Vec<PageTopicCount>,
    pub coverage: Vec<TagCoverageView>,
    pub sunburst: Breadcrumbs,
    pub matches: Vec<MatchRow>,
}

impl CompareView {
    /// The page before any document has been analyzed.
    pub fn empty() -> Self {
        Self {
            analyzed: false,
            document: None,
            match_count: 0,
            page_count: 0,
            topics: Vec::new(),
            coverage: Vec::new(),
            sunburst: Breadcrumbs::default(),
            matches: Vec::new(),
        }
    }
}

/// Library coverage for one tag.
#[derive(Debug, Serialize)]
pub struct TagCoverageView {
    pub tag: String,
    pub matched: Vec<LibraryEntry>,
    pub not_matched: Vec<LibraryEntry>,
}

/// One match on the comparison page.
#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub input_text: String,
    pub similarity_percent: String,
    pub color: &'static str,
    pub library_document: String,
    pub library_text: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FileListingView {
    pub files: Vec<StageFileView>,
    pub analyzable_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StageFileView {
    pub name: String,
    pub path: String,
    pub viewable: bool,
    pub analyzable: bool,
}

#[derive(Debug, Serialize)]
pub struct FilePreviewView {
    pub name: String,
    pub content_base64: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResultView {
    pub analyzed_count: usize,
    pub documents: Vec<String>,
}

/// Collection overview: which topics have hits across the batch, and the
/// tag hits per analyzed document.
#[derive(Debug, Serialize)]
pub struct CollectionView {
    pub analyzed: bool,
    pub topic_counts: Vec<TagCountView>,
    pub documents: Vec<DocumentTagsView>,
}

#[derive(Debug, Serialize)]
pub struct TagCountView {
    pub tag: String,
    /// Truncated display label for the topic button.
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DocumentTagsView {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub tag: String,
    pub summary: Option<String>,
    pub sources: Vec<SourceRow>,
}

/// One row of the 1-indexed summary reference table.
#[derive(Debug, Serialize)]
pub struct SourceRow {
    pub index: usize,
    pub document: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub answer: String,
    pub references: Vec<AnswerRow>,
}

#[derive(Debug, Serialize)]
pub struct AnswerRow {
    pub name: String,
    /// First tag of the referenced library document, empty when untagged.
    pub tag: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct StrictnessView {
    pub level: String,
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct TagOptionsView {
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CredentialsView {
    pub complete: bool,
    pub default_credentials_enabled: bool,
}
