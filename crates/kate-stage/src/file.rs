//! Stage path classification and payload encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// File extensions batch analysis can process.
const ANALYZABLE_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// A file on the remote stage, identified by its relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFile {
    path: String,
}

impl StageFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The full relative path on the stage.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The base name without any directory components.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension, if the name has one.
    fn extension(&self) -> Option<String> {
        let name = self.name();
        name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
    }

    /// Whether the dashboard can render the file inline (PDF only).
    pub fn is_viewable(&self) -> bool {
        self.extension().as_deref() == Some("pdf")
    }

    /// Whether batch analysis accepts the file.
    pub fn is_analyzable(&self) -> bool {
        match self.extension() {
            Some(ext) => ANALYZABLE_EXTENSIONS.contains(&ext.as_str()),
            None => false,
        }
    }
}

/// Standard base64 of a downloaded payload, for inline rendering.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_strips_directory_components() {
        assert_eq!(StageFile::new("reports/2026/a.pdf").name(), "a.pdf");
        assert_eq!(StageFile::new("a.pdf").name(), "a.pdf");
    }

    #[test]
    fn only_pdf_is_viewable() {
        assert!(StageFile::new("a.pdf").is_viewable());
        assert!(StageFile::new("a.PDF").is_viewable());
        assert!(!StageFile::new("a.txt").is_viewable());
        assert!(!StageFile::new("a.docx").is_viewable());
    }

    #[test]
    fn analyzable_extensions_are_pdf_txt_docx() {
        assert!(StageFile::new("a.pdf").is_analyzable());
        assert!(StageFile::new("a.txt").is_analyzable());
        assert!(StageFile::new("dir/a.DOCX").is_analyzable());
        assert!(!StageFile::new("a.csv").is_analyzable());
        assert!(!StageFile::new("noextension").is_analyzable());
    }

    #[test]
    fn base64_round_trips_through_the_standard_alphabet() {
        assert_eq!(to_base64(b"hello"), "aGVsbG8=");
        assert_eq!(to_base64(b""), "");
    }
}
