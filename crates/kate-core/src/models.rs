//! Core data models for K-A-T-E One.
//!
//! These types mirror the semantha API's document/reference graph and the
//! library metadata consumed by the dashboard. All entities are transient
//! and live only in session memory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DOCUMENT GRAPH
// =============================================================================

/// An analyzed input document with its per-paragraph library references.
///
/// Traversal order Document → Page → Content → Paragraph → Reference is
/// stable and determines display order and page-number attribution
/// (1-indexed in output, 0-indexed internally).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One page of an analyzed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Absent contents contribute nothing to any aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Content>>,
}

/// A content block grouping paragraphs on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<Paragraph>>,
}

/// A paragraph of input text with its library references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

/// A link from an input paragraph to a library paragraph with a similarity
/// score in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub document_id: String,
    pub paragraph_id: String,
    pub similarity: f64,
}

// =============================================================================
// LIBRARY
// =============================================================================

/// Summary of a reference library document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content_preview: String,
}

/// Node in the hierarchical document-classification tree.
///
/// `parent_id` links toward the root; breadcrumb construction walks parent
/// links until it reaches a node without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentClass {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

// =============================================================================
// QUESTION ANSWERING
// =============================================================================

/// A retrieval-augmented answer with its supporting library references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub references: Vec<AnswerReference>,
}

/// A library document cited by a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReference {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
}

// =============================================================================
// BATCH ANNOTATIONS
// =============================================================================

/// Per-paragraph annotation recorded during batch analysis: the paragraph's
/// top reference and the first tag of the referenced library document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphAnnotation {
    pub paragraph_id: String,
    pub reference: Reference,
    pub tag: String,
}

/// Mapping of document name to its per-paragraph annotations, as accumulated
/// by a document-collection analysis.
pub type BatchAnnotations = BTreeMap<String, Vec<ParagraphAnnotation>>;

// =============================================================================
// STAGE CREDENTIALS
// =============================================================================

/// Credential record for the remote document stage.
///
/// Every field must be non-empty before any storage operation is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCredentials {
    pub account: String,
    pub user: String,
    pub password: String,
    pub role: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub stage: String,
}

impl StageCredentials {
    /// True when every field is filled in.
    pub fn is_complete(&self) -> bool {
        !self.account.is_empty()
            && !self.user.is_empty()
            && !self.password.is_empty()
            && !self.role.is_empty()
            && !self.warehouse.is_empty()
            && !self.database.is_empty()
            && !self.schema.is_empty()
            && !self.stage.is_empty()
    }

    /// True when at least one field is filled in.
    pub fn is_any_set(&self) -> bool {
        *self != Self::default()
    }

    /// Return a copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            account: self.account.trim().to_string(),
            user: self.user.trim().to_string(),
            password: self.password.trim().to_string(),
            role: self.role.trim().to_string(),
            warehouse: self.warehouse.trim().to_string(),
            database: self.database.trim().to_string(),
            schema: self.schema.trim().to_string(),
            stage: self.stage.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_credentials() -> StageCredentials {
        StageCredentials {
            account: "acct".into(),
            user: "user".into(),
            password: "pw".into(),
            role: "role".into(),
            warehouse: "wh".into(),
            database: "db".into(),
            schema: "schema".into(),
            stage: "stage".into(),
        }
    }

    #[test]
    fn default_credentials_are_incomplete() {
        let creds = StageCredentials::default();
        assert!(!creds.is_complete());
        assert!(!creds.is_any_set());
    }

    #[test]
    fn complete_credentials_pass_the_gate() {
        assert!(complete_credentials().is_complete());
    }

    #[test]
    fn one_empty_field_blocks_the_gate() {
        let mut creds = complete_credentials();
        creds.warehouse.clear();
        assert!(!creds.is_complete());
        assert!(creds.is_any_set());
    }

    #[test]
    fn trimmed_strips_every_field() {
        let mut creds = complete_credentials();
        creds.account = "  acct  ".into();
        creds.stage = "\tstage\n".into();
        let trimmed = creds.trimmed();
        assert_eq!(trimmed.account, "acct");
        assert_eq!(trimmed.stage, "stage");
    }

    #[test]
    fn document_deserializes_with_absent_substructure() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"d1","name":"input.pdf","pages":[{},{"contents":[{}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[0].contents.is_none());
        assert!(doc.pages[1].contents.as_ref().unwrap()[0].paragraphs.is_none());
    }

    #[test]
    fn reference_uses_camel_case_on_the_wire() {
        let r: Reference = serde_json::from_str(
            r#"{"documentId":"lib1","paragraphId":"p1","similarity":0.82}"#,
        )
        .unwrap();
        assert_eq!(r.document_id, "lib1");
        assert_eq!(r.paragraph_id, "p1");
        assert!((r.similarity - 0.82).abs() < f64::EPSILON);
    }
}
