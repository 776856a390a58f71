//! Structured logging field name constants for K-A-T-E One.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Remote call failed, request aborted |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events, completed analyses |
//! | DEBUG | Decision points, cache hits/misses |
//! | TRACE | Per-item iteration (matches, stage files) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "semantha", "stage", "aggregate"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "compare_to_library", "summarize", "list_file_names"
pub const OPERATION: &str = "op";

/// Session identifier the request belongs to.
pub const SESSION_ID: &str = "session_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Input document name being analyzed.
pub const DOCUMENT: &str = "document";

/// Library document id being resolved.
pub const DOC_ID: &str = "doc_id";

/// Tag/topic involved in the operation.
pub const TAG: &str = "tag";

/// Active dashboard page.
pub const PAGE: &str = "page";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of paragraph matches produced by an analysis.
pub const MATCH_COUNT: &str = "match_count";

/// Number of stage files listed or processed.
pub const FILE_COUNT: &str = "file_count";

/// Number of summarization sources submitted.
pub const SOURCE_COUNT: &str = "source_count";

/// Number of rows/entries returned to the view.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
