//! Text display helpers.

/// Truncate `text` to `limit` characters, appending `"..."` when cut.
///
/// The boundary is inclusive: only a character count strictly greater than
/// `limit` triggers truncation.
pub fn short_text(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
