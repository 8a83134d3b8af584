//! Stage 1: partition raw document lines into named sections.
//!
//! The sectionizer scans lines sequentially and tests each against the
//! declarative marker table in [`TocSpec`]. A matching line closes the
//! previously open section and opens a new one; everything else accumulates
//! into the open section's content. Sections whose markers never match are
//! reported as missing in the statistics block, not treated as errors.

use crate::document::{Metadata, SourceDocument};
use crate::toc::TocSpec;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Stage name recorded in artifact metadata.
pub const STAGE_NAME: &str = "sectionize";

/// A named region of the source document.
///
/// A section that matched a boundary marker but accumulated no content is a
/// stub carrying only `line_start`; the optional fields are omitted from the
/// artifact entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Canonical section title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Accumulated content, non-blank lines joined by `\n`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Line index where the section's marker first matched
    pub line_start: usize,
    /// Last line index of the section's content range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_end: Option<usize>,
    /// Whitespace-delimited token count of `content`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl Section {
    fn stub(line_start: usize) -> Self {
        Section {
            title: None,
            content: None,
            line_start,
            line_end: None,
            word_count: None,
        }
    }
}

/// Sectionizer statistics, including the soft missing-section report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionStatistics {
    /// Number of sections whose marker matched (stubs included)
    pub total_sections: usize,
    /// Number of lines in the source document
    pub total_lines: usize,
    /// Sum of all section word counts
    pub total_words: usize,
    /// Canonical names of matched sections, in discovery order
    pub sections_found: Vec<String>,
    /// Expected sections whose marker never matched, in TOC order
    pub sections_missing: Vec<String>,
}

/// Output of the sectionizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionedDocument {
    /// Artifact metadata block
    pub metadata: Metadata,
    /// Canonical section names in their authoritative order
    pub table_of_contents: Vec<String>,
    /// Matched sections keyed by canonical name, in discovery order
    pub sections: IndexMap<String, Section>,
    /// Stage statistics
    pub statistics: SectionStatistics,
}

/// Strip the line-number/arrow annotation used by the source format.
///
/// Lines may be prefixed `NN→text`; the candidate text is everything after
/// the first arrow, taken verbatim. Unannotated lines are trimmed.
fn candidate_text(line: &str) -> &str {
    match line.split_once('→') {
        Some((_, rest)) => rest,
        None => line.trim(),
    }
}

/// Partition a source document into sections according to the marker table.
pub fn sectionize(source: &SourceDocument, toc: &TocSpec) -> SectionedDocument {
    let lines = source.lines();
    let mut sections: IndexMap<String, Section> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut content: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let candidate = candidate_text(line);

        if let Some(name) = toc.match_marker(candidate) {
            if let Some(open) = current.take() {
                if !content.is_empty() {
                    close_section(&mut sections, &open, &content, i.saturating_sub(1));
                }
            }
            content.clear();
            debug!("section '{}' opens at line {}", name, i);
            sections
                .entry(name.to_string())
                .or_insert_with(|| Section::stub(i));
            current = Some(name.to_string());
        } else if current.is_some() && !candidate.is_empty() {
            content.push(candidate.to_string());
        }
    }

    if let Some(open) = current {
        if !content.is_empty() {
            close_section(&mut sections, &open, &content, lines.len().saturating_sub(1));
        }
    }

    let total_words = sections.values().map(|s| s.word_count.unwrap_or(0)).sum();
    let sections_found: Vec<String> = sections.keys().cloned().collect();
    let sections_missing: Vec<String> = toc
        .names()
        .into_iter()
        .filter(|name| !sections.contains_key(name))
        .collect();
    for name in &sections_missing {
        warn!("expected section '{}' not found in source", name);
    }

    SectionedDocument {
        metadata: Metadata::initial(source.info(), source.source_file(), STAGE_NAME),
        table_of_contents: toc.names(),
        statistics: SectionStatistics {
            total_sections: sections.len(),
            total_lines: lines.len(),
            total_words,
            sections_found,
            sections_missing,
        },
        sections,
    }
}

fn close_section(
    sections: &mut IndexMap<String, Section>,
    name: &str,
    content: &[String],
    line_end: usize,
) {
    let text = content.join("\n").trim().to_string();
    let word_count = text.split_whitespace().count();
    // The stub was inserted when the marker matched; line_start stays.
    let section = sections
        .entry(name.to_string())
        .or_insert_with(|| Section::stub(0));
    section.title = Some(name.to_string());
    section.content = Some(text);
    section.line_end = Some(line_end);
    section.word_count = Some(word_count);
}
