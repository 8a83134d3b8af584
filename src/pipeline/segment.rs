//! Stage 2: assign node ids and split section content into paragraphs.
//!
//! The segmenter walks sections in their discovery order, assigns every
//! section and paragraph an id from a single run-scoped [`IdGenerator`], and
//! splits section content at single-line granularity: each surviving
//! non-blank line becomes one paragraph.

use crate::document::Metadata;
use crate::ids::{IdGenerator, NodeId, NodeKind};
use crate::pipeline::sectionize::SectionedDocument;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Stage name recorded in artifact metadata.
pub const STAGE_NAME: &str = "segment";

/// A single paragraph within a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Unique node id
    pub id: NodeId,
    /// Owning section's id
    pub parent_id: NodeId,
    /// Trimmed paragraph text, never blank
    pub text: String,
    /// Whitespace-delimited token count of `text`
    pub word_count: usize,
    /// Approximate source line number.
    ///
    /// Derived from the section's `line_start` plus the paragraph's position
    /// in the section content. Blank-line stripping in earlier stages means
    /// this is best-effort, not an exact source correspondence.
    pub line_number: usize,
    /// 0-based position within the section's paragraph list
    pub paragraph_index: usize,
}

/// A section enriched with identity and its paragraph list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedSection {
    /// Unique node id
    pub id: NodeId,
    /// Always the root id
    pub parent_id: NodeId,
    /// Section title (canonical name when Stage 1 left a stub)
    pub title: String,
    /// Line index where the section's marker matched
    pub line_start: usize,
    /// Last content line index, absent for stub sections
    pub line_end: Option<usize>,
    /// Stage 1 aggregate word count for the section
    pub total_word_count: usize,
    /// Number of paragraphs
    pub paragraph_count: usize,
    /// Paragraphs in source order
    pub paragraphs: Vec<Paragraph>,
}

/// Segmenter statistics; itself a node in the document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentStatistics {
    /// This statistics node's id (`stats_<high-water>`)
    pub id: NodeId,
    /// Always the root id
    pub parent_id: NodeId,
    /// Number of sections processed
    pub total_sections: usize,
    /// Number of paragraphs produced
    pub total_paragraphs: usize,
    /// Sum of paragraph word counts
    pub total_words: usize,
    /// Id-counter high-water mark for the run
    pub total_nodes: u64,
    /// Section names in processing order
    pub sections_processed: Vec<String>,
    /// Paragraphs per section, rounded to 2 decimals, 0 when no sections
    pub average_paragraphs_per_section: f64,
    /// Words per paragraph, rounded to 2 decimals, 0 when no paragraphs
    pub average_words_per_paragraph: f64,
}

/// Output of the segmenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedDocument {
    /// Artifact metadata block, carrying the root node identity
    pub metadata: Metadata,
    /// Canonical section names in their authoritative order
    pub table_of_contents: Vec<String>,
    /// Sections keyed by canonical name, in Stage 1 discovery order
    pub sections: IndexMap<String, SegmentedSection>,
    /// Stage statistics
    pub statistics: SegmentStatistics,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assign ids and split every section's content into paragraphs.
///
/// `previous_step` is the artifact the input document was read from and is
/// recorded as provenance in the output metadata.
pub fn segment(doc: &SectionedDocument, previous_step: &str) -> SegmentedDocument {
    let mut ids = IdGenerator::new();
    let mut sections: IndexMap<String, SegmentedSection> = IndexMap::new();
    let mut total_paragraphs = 0usize;
    let mut total_words = 0usize;

    for (name, section) in &doc.sections {
        let section_id = ids.next_id(NodeKind::Section);
        let content = section.content.as_deref().unwrap_or("");

        let mut paragraphs: Vec<Paragraph> = Vec::new();
        for (raw_index, raw_line) in content.split('\n').enumerate() {
            let text = raw_line.trim();
            if text.is_empty() {
                continue;
            }
            let word_count = text.split_whitespace().count();
            paragraphs.push(Paragraph {
                id: ids.next_id(NodeKind::Paragraph),
                parent_id: section_id.clone(),
                text: text.to_string(),
                word_count,
                line_number: section.line_start + raw_index,
                paragraph_index: paragraphs.len(),
            });
            total_words += word_count;
        }

        debug!("section '{}': {} paragraphs", name, paragraphs.len());
        total_paragraphs += paragraphs.len();
        sections.insert(
            name.clone(),
            SegmentedSection {
                id: section_id,
                parent_id: NodeId::root(),
                title: section.title.clone().unwrap_or_else(|| name.clone()),
                line_start: section.line_start,
                line_end: section.line_end,
                total_word_count: section.word_count.unwrap_or(0),
                paragraph_count: paragraphs.len(),
                paragraphs,
            },
        );
    }

    let total_nodes = ids.high_water();
    let statistics = SegmentStatistics {
        id: ids.stamp(NodeKind::Statistics),
        parent_id: NodeId::root(),
        total_sections: sections.len(),
        total_paragraphs,
        total_words,
        total_nodes,
        sections_processed: sections.keys().cloned().collect(),
        average_paragraphs_per_section: if sections.is_empty() {
            0.0
        } else {
            round2(total_paragraphs as f64 / sections.len() as f64)
        },
        average_words_per_paragraph: if total_paragraphs == 0 {
            0.0
        } else {
            round2(total_words as f64 / total_paragraphs as f64)
        },
    };

    SegmentedDocument {
        metadata: doc.metadata.derive(STAGE_NAME, previous_step),
        table_of_contents: doc.table_of_contents.clone(),
        sections,
        statistics,
    }
}
