//! Result aggregation: pure transforms over analyzed documents.
//!
//! Everything here is deterministic and synchronous. Lookup data that lives
//! behind the service client (tags per library document, the category tree)
//! is pre-resolved by the caller into [`TagIndex`]/[`CategoryIndex`] so the
//! transforms stay pure. Absent optional substructure (contents, paragraphs,
//! references) contributes nothing; aggregations over zero matches return
//! empty containers.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::defaults::{self, NO_TAG};
use crate::models::{BatchAnnotations, Document, DocumentClass, LibraryEntry, Paragraph, Reference};
use crate::text::short_text;

/// Synthetic root for matches whose referenced document has no category.
pub const UNCATEGORIZED: &str = "uncategorized";

// =============================================================================
// PARAGRAPH MATCHES
// =============================================================================

/// A paragraph with at least one reference into the library.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphMatch<'a> {
    pub paragraph: &'a Paragraph,
    pub references: &'a [Reference],
}

impl ParagraphMatch<'_> {
    /// The highest-ranked reference of this match.
    pub fn top_reference(&self) -> &Reference {
        &self.references[0]
    }
}

/// Collect every paragraph with a non-empty reference list, in document
/// order (Page → Content → Paragraph).
pub fn paragraph_matches(doc: &Document) -> Vec<ParagraphMatch<'_>> {
    let mut matches = Vec::new();
    for page in &doc.pages {
        let Some(contents) = &page.contents else {
            continue;
        };
        for content in contents {
            let Some(paragraphs) = &content.paragraphs else {
                continue;
            };
            for paragraph in paragraphs {
                if let Some(references) = &paragraph.references {
                    if !references.is_empty() {
                        matches.push(ParagraphMatch {
                            paragraph,
                            references,
                        });
                    }
                }
            }
        }
    }
    matches
}

/// Ids of every library document referenced by the given document's matches.
pub fn referenced_document_ids(doc: &Document) -> HashSet<String> {
    paragraph_matches(doc)
        .iter()
        .flat_map(|m| m.references.iter().map(|r| r.document_id.clone()))
        .collect()
}

// =============================================================================
// LOOKUP INDICES
// =============================================================================

/// Pre-resolved tag sets per library document id.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: HashMap<String, Vec<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the direct+derived tags of a library document.
    pub fn insert(&mut self, doc_id: impl Into<String>, tags: Vec<String>) {
        self.tags.insert(doc_id.into(), tags);
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.tags.contains_key(doc_id)
    }

    /// Tags of the document, or the sentinel [`NO_TAG`] when none are known.
    pub fn tags_or_sentinel(&self, doc_id: &str) -> Vec<String> {
        match self.tags.get(doc_id) {
            Some(tags) if !tags.is_empty() => tags.clone(),
            _ => vec![NO_TAG.to_string()],
        }
    }
}

/// Pre-resolved category tree fragments: the (optional) leaf category per
/// library document, and every category reachable via parent links.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_document: HashMap<String, Option<DocumentClass>>,
    by_id: HashMap<String, DocumentClass>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the leaf category of a library document (None = uncategorized).
    pub fn insert_document_category(
        &mut self,
        doc_id: impl Into<String>,
        category: Option<DocumentClass>,
    ) {
        if let Some(cat) = &category {
            self.by_id.entry(cat.id.clone()).or_insert_with(|| cat.clone());
        }
        self.by_document.insert(doc_id.into(), category);
    }

    /// Record a category node (typically an ancestor on a parent walk).
    pub fn insert_category(&mut self, category: DocumentClass) {
        self.by_id.insert(category.id.clone(), category);
    }

    pub fn contains_document(&self, doc_id: &str) -> bool {
        self.by_document.contains_key(doc_id)
    }

    pub fn contains_category(&self, category_id: &str) -> bool {
        self.by_id.contains_key(category_id)
    }

    pub fn document_category(&self, doc_id: &str) -> Option<&DocumentClass> {
        self.by_document.get(doc_id).and_then(|c| c.as_ref())
    }

    pub fn category(&self, category_id: &str) -> Option<&DocumentClass> {
        self.by_id.get(category_id)
    }
}

// =============================================================================
// PER-PAGE TOPIC COUNTS
// =============================================================================

/// One bar-chart row: matches for a topic on a page (1-indexed page label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTopicCount {
    pub page: String,
    pub topic: String,
    pub count: u64,
}

/// Count references per (page, topic), resolving each reference target's
/// tag set through `tags` (sentinel for untagged targets).
///
/// Rows appear in page order, then first-seen topic order within a page.
/// `selected` restricts the output to the given topics; empty = no filter.
pub fn topic_counts_per_page(
    doc: &Document,
    tags: &TagIndex,
    selected: &[String],
) -> Vec<PageTopicCount> {
    let mut rows = Vec::new();
    for (page_idx, page) in doc.pages.iter().enumerate() {
        let mut counts: Vec<(String, u64)> = Vec::new();
        let Some(contents) = &page.contents else {
            continue;
        };
        for content in contents {
            let Some(paragraphs) = &content.paragraphs else {
                continue;
            };
            for paragraph in paragraphs {
                let Some(references) = &paragraph.references else {
                    continue;
                };
                for reference in references {
                    for tag in tags.tags_or_sentinel(&reference.document_id) {
                        match counts.iter_mut().find(|(t, _)| *t == tag) {
                            Some((_, count)) => *count += 1,
                            None => counts.push((tag, 1)),
                        }
                    }
                }
            }
        }
        for (topic, count) in counts {
            if selected.is_empty() || selected.contains(&topic) {
                rows.push(PageTopicCount {
                    page: (page_idx + 1).to_string(),
                    topic,
                    count,
                });
            }
        }
    }
    debug!(result_count = rows.len(), "per-page topic counts built");
    rows
}

// =============================================================================
// LIBRARY COVERAGE
// =============================================================================

/// Library entries of one tag, partitioned by whether the current document
/// references them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagCoverage {
    pub matched: Vec<LibraryEntry>,
    pub not_matched: Vec<LibraryEntry>,
}

/// Partition `entries` by membership of their id in `referenced`, preserving
/// the original order within each partition.
pub fn split_by_match(entries: &[LibraryEntry], referenced: &HashSet<String>) -> TagCoverage {
    let mut coverage = TagCoverage::default();
    for entry in entries {
        if referenced.contains(&entry.id) {
            coverage.matched.push(entry.clone());
        } else {
            coverage.not_matched.push(entry.clone());
        }
    }
    coverage
}

// =============================================================================
// SUNBURST BREADCRUMBS
// =============================================================================

/// Parallel label/parent arrays for the sunburst chart. A node's parent is
/// referenced by name; roots have the empty string as parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breadcrumbs {
    pub labels: Vec<String>,
    pub parents: Vec<String>,
}

/// Build the category breadcrumb arrays for every paragraph match whose top
/// reference carries at least one tag intersecting `selected` (or all
/// matches when `selected` is empty).
///
/// Category chains are resolved leaf→root, inserting each unseen category
/// name once; matches without a category attach to a synthetic
/// [`UNCATEGORIZED`] root. The leaf label is the 1-indexed match number plus
/// the paragraph text truncated to `text_limit` characters.
pub fn sunburst_breadcrumbs(
    matches: &[ParagraphMatch<'_>],
    tags: &TagIndex,
    categories: &CategoryIndex,
    selected: &[String],
    text_limit: usize,
) -> Breadcrumbs {
    let mut crumbs = Breadcrumbs::default();
    for (idx, m) in matches.iter().enumerate() {
        let top = m.top_reference();
        let match_tags = tags.tags_or_sentinel(&top.document_id);
        if !selected.is_empty() && !match_tags.iter().any(|t| selected.contains(t)) {
            continue;
        }
        let parent = match categories.document_category(&top.document_id) {
            Some(leaf) => {
                let resolved = categories.category(&leaf.id).unwrap_or(leaf);
                insert_category_chain(resolved, categories, &mut crumbs)
            }
            None => {
                if !crumbs.labels.iter().any(|l| l == UNCATEGORIZED) {
                    crumbs.labels.push(UNCATEGORIZED.to_string());
                    crumbs.parents.push(String::new());
                }
                UNCATEGORIZED.to_string()
            }
        };
        crumbs.labels.push(format!(
            "Match {}: {}",
            idx + 1,
            short_text(&m.paragraph.text, text_limit)
        ));
        crumbs.parents.push(parent);
    }
    debug!(result_count = crumbs.labels.len(), "sunburst breadcrumbs built");
    crumbs
}

/// Walk the chain from `leaf` to the root, inserting unseen category names,
/// and return the name the leaf label should attach to.
fn insert_category_chain(
    leaf: &DocumentClass,
    categories: &CategoryIndex,
    crumbs: &mut Breadcrumbs,
) -> String {
    let mut visited = HashSet::new();
    insert_chain(leaf, categories, &mut visited, crumbs).unwrap_or_default()
}

fn insert_chain(
    cat: &DocumentClass,
    categories: &CategoryIndex,
    visited: &mut HashSet<String>,
    crumbs: &mut Breadcrumbs,
) -> Option<String> {
    if !visited.insert(cat.id.clone()) {
        // Parent links cycled; stop the walk at the revisited node.
        return (!cat.name.is_empty()).then(|| cat.name.clone());
    }
    let parent_name = cat
        .parent_id
        .as_deref()
        .and_then(|pid| categories.category(pid))
        .and_then(|parent| insert_chain(parent, categories, visited, crumbs))
        .unwrap_or_default();
    if cat.name.is_empty() {
        // Unnamed nodes are omitted; descendants attach to this node's parent.
        return (!parent_name.is_empty()).then_some(parent_name);
    }
    if !crumbs.labels.contains(&cat.name) {
        crumbs.labels.push(cat.name.clone());
        crumbs.parents.push(parent_name);
    }
    Some(cat.name.clone())
}

// =============================================================================
// BATCH AGGREGATION
// =============================================================================

/// Count how many annotations across the whole batch carry each tag.
pub fn batch_tag_counts(annotations: &BatchAnnotations) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for anns in annotations.values() {
        for ann in anns {
            *counts.entry(ann.tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

// =============================================================================
// SUMMARIZATION SOURCES
// =============================================================================

/// One citation context for summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySource {
    pub text: String,
    pub document: String,
}

/// For every batch annotation carrying `tag`, locate the annotated paragraph
/// inside its document and take it together with up to
/// [`defaults::SUMMARY_CONTEXT_PARAGRAPHS`] preceding paragraphs (fewer near
/// the document start) as one citation source.
pub fn summary_sources(
    tag: &str,
    annotations: &BatchAnnotations,
    documents: &[Document],
) -> Vec<SummarySource> {
    let mut sources = Vec::new();
    for (doc_name, anns) in annotations {
        for ann in anns.iter().filter(|a| a.tag == tag) {
            let Some(doc) = documents.iter().find(|d| d.name == *doc_name) else {
                continue;
            };
            if let Some(text) = context_window(doc, &ann.paragraph_id) {
                sources.push(SummarySource {
                    text,
                    document: doc_name.clone(),
                });
            }
        }
    }
    debug!(
        tag = %tag,
        source_count = sources.len(),
        "summarization sources selected"
    );
    sources
}

/// The paragraph with the given id joined with up to
/// [`defaults::SUMMARY_CONTEXT_PARAGRAPHS`] preceding paragraphs, in
/// traversal order. None when the id does not occur in the document.
fn context_window(doc: &Document, paragraph_id: &str) -> Option<String> {
    let mut window: Vec<&Paragraph> = Vec::new();
    for page in &doc.pages {
        let Some(contents) = &page.contents else {
            continue;
        };
        for content in contents {
            let Some(paragraphs) = &content.paragraphs else {
                continue;
            };
            for paragraph in paragraphs {
                window.push(paragraph);
                if paragraph.id == paragraph_id {
                    let start = window
                        .len()
                        .saturating_sub(defaults::SUMMARY_CONTEXT_PARAGRAPHS + 1);
                    return Some(
                        window[start..]
                            .iter()
                            .map(|p| p.text.as_str())
                            .collect::<Vec<_>>()
                            .join("\n"),
                    );
                }
            }
        }
    }
    None
}
