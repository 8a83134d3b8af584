//! Source document model and per-stage metadata.
//!
//! A [`SourceDocument`] is the raw input to the pipeline: the document's
//! descriptive info plus its lines. Every stage artifact carries a
//! [`Metadata`] block recording the same descriptive info along with
//! provenance (which stage produced it, which artifact it was derived from).

use crate::error::Result;
use crate::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Descriptive information about the document being processed.
///
/// These fields are carried verbatim through every stage artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: String,
    /// Document author
    pub author: String,
    /// Document version string
    pub version: String,
    /// Free-form last-updated marker from the source document
    pub last_updated: String,
}

impl DocumentInfo {
    /// Create document info with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        DocumentInfo {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Metadata block present at the top of every stage artifact.
///
/// From the segmenter onward the block doubles as the document's root node:
/// `id` is the fixed root id and `parent_id` an explicit `null`. The
/// sectionizer's artifact predates node identity and omits both keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,
    /// Document author
    pub author: String,
    /// Document version string
    pub version: String,
    /// Last-updated marker
    pub last_updated: String,
    /// Name of the original source file
    pub source_file: String,
    /// Stage that produced this artifact (`sectionize`, `segment`, `index`, `paginate`)
    pub parsing_step: String,
    /// Artifact this one was derived from, absent on the first stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_step: Option<String>,
    /// Root-node id, attached from the segmenter onward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    /// Root parent link: the outer `Option` is presence of the key, the
    /// inner the (always null) parent reference
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub parent_id: Option<Option<NodeId>>,
    /// Pagination budget, recorded by the paginator only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_words_per_page: Option<usize>,
}

/// A key that is present deserializes to `Some(value-or-null)`; an absent
/// key falls back to the field default, `None`.
fn present_nullable<'de, D>(deserializer: D) -> std::result::Result<Option<Option<NodeId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NodeId>::deserialize(deserializer).map(Some)
}

impl Metadata {
    /// Metadata for the first stage: no provenance, no root node yet.
    pub fn initial(info: &DocumentInfo, source_file: &str, parsing_step: &str) -> Self {
        Metadata {
            title: info.title.clone(),
            author: info.author.clone(),
            version: info.version.clone(),
            last_updated: info.last_updated.clone(),
            source_file: source_file.to_string(),
            parsing_step: parsing_step.to_string(),
            previous_step: None,
            id: None,
            parent_id: None,
            target_words_per_page: None,
        }
    }

    /// Metadata derived from an earlier stage's block.
    ///
    /// Copies the descriptive fields, records the new stage name and the
    /// input artifact, and attaches the root-node identity.
    pub fn derive(&self, parsing_step: &str, previous_step: &str) -> Self {
        Metadata {
            title: self.title.clone(),
            author: self.author.clone(),
            version: self.version.clone(),
            last_updated: self.last_updated.clone(),
            source_file: self.source_file.clone(),
            parsing_step: parsing_step.to_string(),
            previous_step: Some(previous_step.to_string()),
            id: Some(NodeId::root()),
            parent_id: Some(None),
            target_words_per_page: None,
        }
    }

    /// The root-node id recorded in this block, defaulting to the fixed
    /// root id for blocks that predate node identity.
    pub fn root_id(&self) -> NodeId {
        self.id.clone().unwrap_or_else(NodeId::root)
    }
}

/// A raw source document: descriptive info plus the document's lines.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    info: DocumentInfo,
    source_file: String,
    lines: Vec<String>,
}

impl SourceDocument {
    /// Build a source document from in-memory text.
    ///
    /// `source_file` is recorded in artifact metadata only; the text is
    /// split on `\n` without any normalization.
    pub fn from_text(info: DocumentInfo, source_file: impl Into<String>, text: &str) -> Self {
        SourceDocument {
            info,
            source_file: source_file.into(),
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Read a source document from a UTF-8 text file.
    pub fn open(info: DocumentInfo, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(info, path.to_string_lossy(), &text))
    }

    /// Descriptive document info.
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Name of the file this document was read from.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// The document's lines, in source order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_preserves_blank_lines() {
        let doc = SourceDocument::from_text(DocumentInfo::default(), "mem", "a\n\nb");
        assert_eq!(doc.lines(), &["a", "", "b"]);
    }

    #[test]
    fn test_derive_attaches_root_and_provenance() {
        let info = DocumentInfo::titled("T");
        let first = Metadata::initial(&info, "doc.txt", "sectionize");
        assert!(first.id.is_none());
        assert!(first.previous_step.is_none());

        let second = first.derive("segment", "sections.json");
        assert_eq!(second.parsing_step, "segment");
        assert_eq!(second.previous_step.as_deref(), Some("sections.json"));
        assert_eq!(second.id, Some(NodeId::root()));
        assert_eq!(second.parent_id, Some(None));
    }

    #[test]
    fn test_metadata_round_trips_through_json() {
        let info = DocumentInfo::titled("T");
        let first = Metadata::initial(&info, "doc.txt", "sectionize");
        let second = first.derive("segment", "sections.json");

        // Stage 1: id/parent_id keys absent entirely.
        let json1 = serde_json::to_value(&first).unwrap();
        assert!(json1.get("id").is_none());
        assert!(json1.get("parent_id").is_none());

        // Stage 2: id present, parent_id an explicit null that survives a
        // round trip byte for byte.
        let json2 = serde_json::to_string_pretty(&second).unwrap();
        assert!(json2.contains("\"parent_id\": null"));
        let back: Metadata = serde_json::from_str(&json2).unwrap();
        assert_eq!(serde_json::to_string_pretty(&back).unwrap(), json2);
    }
}
