//! The four-stage document structuring pipeline.
//!
//! ```text
//! Source text
//!     ↓
//! [sectionize] marker scan → named sections with line ranges
//!     ↓
//! [segment]    node ids + single-line paragraph split
//!     ↓                         ↓
//! [paginate]   word-budgeted pages + resolved TOC
//!     ↓
//! [index]      word index, path index, page cross-reference
//! ```
//!
//! Each stage is a pure transformation: it reads one immutable document and
//! produces a new one, so stages are independently re-runnable and a rerun
//! over identical input yields identical output. The indexer's dependency
//! on the paginator is soft — it accepts the paginated document as an
//! `Option` and simply emits an empty cross-reference without it.

pub mod index;
pub mod paginate;
pub mod sectionize;
pub mod segment;
pub mod stopwords;

pub use index::{index, IndexedDocument};
pub use paginate::{paginate, Page, PageItem, PaginatedDocument};
pub use sectionize::{sectionize, SectionedDocument};
pub use segment::{segment, SegmentedDocument};

use crate::artifact;
use crate::config::PipelineConfig;
use crate::document::SourceDocument;
use crate::error::Result;
use crate::toc::TocSpec;
use log::info;

/// All artifacts of one full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Stage 1 artifact
    pub sectioned: SectionedDocument,
    /// Stage 2 artifact
    pub segmented: SegmentedDocument,
    /// Stage 3 artifact, cross-referenced against the Stage 4 pages
    pub indexed: IndexedDocument,
    /// Stage 4 artifact
    pub paginated: PaginatedDocument,
}

/// Runs the full pipeline under one configuration.
///
/// The runner executes stages in dependency order and, because the whole
/// run is in memory, always hands the paginated document to the indexer, so
/// the paragraph-to-page cross-reference is populated.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// A pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// A pipeline with the given configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all four stages over an in-memory source document.
    pub fn run(&self, source: &SourceDocument, toc: &TocSpec) -> PipelineOutput {
        let sectioned = sectionize::sectionize(source, toc);
        info!(
            "sectionize: {} sections, {} missing",
            sectioned.statistics.total_sections,
            sectioned.statistics.sections_missing.len()
        );

        let segmented = segment::segment(&sectioned, &self.config.sections_file);
        info!(
            "segment: {} paragraphs, {} nodes",
            segmented.statistics.total_paragraphs, segmented.statistics.total_nodes
        );

        let paginated = paginate::paginate(
            &segmented,
            self.config.target_words_per_page,
            &self.config.paragraphs_file,
        );
        info!("paginate: {} pages", paginated.statistics.total_pages);

        let indexed = index::index(&segmented, Some(&paginated), &self.config.paragraphs_file);
        info!(
            "index: {} unique words",
            indexed.statistics.unique_meaningful_words
        );

        PipelineOutput {
            sectioned,
            segmented,
            indexed,
            paginated,
        }
    }

    /// Run all four stages and write every artifact to its configured file.
    pub fn run_to_disk(&self, source: &SourceDocument, toc: &TocSpec) -> Result<PipelineOutput> {
        let output = self.run(source, toc);
        artifact::write_json(&output.sectioned, &self.config.sections_file)?;
        artifact::write_json(&output.segmented, &self.config.paragraphs_file)?;
        artifact::write_json(&output.paginated, &self.config.pages_file)?;
        artifact::write_json(&output.indexed, &self.config.index_file)?;
        Ok(output)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
