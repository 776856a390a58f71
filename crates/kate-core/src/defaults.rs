//! Centralized default constants for K-A-T-E One.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// TAGS
// =============================================================================

/// Sentinel tag representing an untagged library document. Treated as a
/// first-class tag in every aggregation.
pub const NO_TAG: &str = "(no tag)";

// =============================================================================
// SIMILARITY BANDS (match display color coding)
// =============================================================================

/// Matches above this similarity render in the high band.
pub const HIGH_SIMILARITY: f64 = 0.95;

/// Matches above this similarity (and at or below the high band) render in
/// the mid band.
pub const MID_SIMILARITY: f64 = 0.80;

/// Display color for the high similarity band.
pub const HIGH_SIMILARITY_COLOR: &str = "#95C23D";

/// Display color for the mid similarity band.
pub const MID_SIMILARITY_COLOR: &str = "#FDD835";

/// Display color for everything below the mid band.
pub const LOW_SIMILARITY_COLOR: &str = "#CCCCCC";

// =============================================================================
// COMPARISON STRICTNESS
// =============================================================================

/// Similarity cutoff for the "Strict" comparison level.
pub const THRESHOLD_STRICT: f64 = 0.75;

/// Similarity cutoff for the "Medium" comparison level (default selection).
pub const THRESHOLD_MEDIUM: f64 = 0.70;

/// Similarity cutoff for the "Relaxed" comparison level.
pub const THRESHOLD_RELAXED: f64 = 0.65;

/// References requested per paragraph when comparing against the library.
pub const COMPARE_MAX_REFERENCES: u32 = 1;

// =============================================================================
// TEXT TRUNCATION
// =============================================================================

/// Default character limit for `short_text`.
pub const SHORT_TEXT_LIMIT: usize = 10;

/// Character limit for sunburst leaf labels.
pub const SUNBURST_TEXT_LIMIT: usize = 100;

/// Character limit for topic buttons in the collection overview.
pub const TAG_LABEL_LIMIT: usize = 30;

// =============================================================================
// QUESTION ANSWERING
// =============================================================================

/// Maximum references for retrieval-augmented answers.
pub const ANSWER_MAX_REFERENCES: u32 = 5;

/// Fixed similarity threshold for retrieval-augmented answers.
pub const ANSWER_SIMILARITY_THRESHOLD: f64 = 0.4;

/// Stop markers truncating generated answers (localized variants included).
pub const ANSWER_STOP_TOKENS: [&str; 4] = ["References:", "Reference:", "Referenzen:", "Referenz:"];

/// Stop markers truncating generated summaries.
pub const SUMMARY_STOP_TOKENS: [&str; 2] = ["References:", "Reference:"];

/// Preceding paragraphs included with each summarization source.
pub const SUMMARY_CONTEXT_PARAGRAPHS: usize = 2;

// =============================================================================
// REMOTE STAGE
// =============================================================================

/// Maximum stage paths fetched per directory listing.
pub const MAX_STAGE_FETCH: usize = 100;

/// Maximum analyzable stage files processed per batch analysis.
pub const MAX_STAGE_FILES: usize = 20;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Capacity of each per-operation memoization map.
///
/// Large enough to be effectively unbounded for realistic session counts
/// while still bounding worst-case memory.
pub const CACHE_CAPACITY: usize = 4096;
