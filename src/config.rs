//! Pipeline configuration.

use crate::document::DocumentInfo;

/// Default pagination budget in words per page.
pub const DEFAULT_WORDS_PER_PAGE: usize = 250;

/// Default Stage 1 artifact filename (sectionizer output, segmenter input).
pub const DEFAULT_SECTIONS_FILE: &str = "sections.json";
/// Default Stage 2 artifact filename (segmenter output, indexer/paginator input).
pub const DEFAULT_PARAGRAPHS_FILE: &str = "paragraphs.json";
/// Default Stage 3 artifact filename (indexer output).
pub const DEFAULT_INDEX_FILE: &str = "index.json";
/// Default Stage 4 artifact filename (paginator output, optional indexer input).
pub const DEFAULT_PAGES_FILE: &str = "pages.json";

/// Configuration for one pipeline run.
///
/// Filenames chain between stages: each stage's output filename is the next
/// stage's input filename. A deployment may override any of them, but the
/// artifact schemas are fixed.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Descriptive info carried into every artifact's metadata block
    pub document: DocumentInfo,
    /// Target word budget per page for the paginator
    pub target_words_per_page: usize,
    /// Sectionizer output / segmenter input
    pub sections_file: String,
    /// Segmenter output / indexer and paginator input
    pub paragraphs_file: String,
    /// Indexer output
    pub index_file: String,
    /// Paginator output, read back by the indexer when present
    pub pages_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            document: DocumentInfo::default(),
            target_words_per_page: DEFAULT_WORDS_PER_PAGE,
            sections_file: DEFAULT_SECTIONS_FILE.to_string(),
            paragraphs_file: DEFAULT_PARAGRAPHS_FILE.to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            pages_file: DEFAULT_PAGES_FILE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the descriptive document info.
    pub fn with_document(mut self, document: DocumentInfo) -> Self {
        self.document = document;
        self
    }

    /// Set the pagination word budget.
    pub fn with_target_words_per_page(mut self, budget: usize) -> Self {
        self.target_words_per_page = budget;
        self
    }

    /// Prefix every artifact filename with a directory.
    pub fn with_output_dir(mut self, dir: &str) -> Self {
        let join = |name: &str| format!("{}/{}", dir.trim_end_matches('/'), name);
        self.sections_file = join(&self.sections_file);
        self.paragraphs_file = join(&self.paragraphs_file);
        self.index_file = join(&self.index_file);
        self.pages_file = join(&self.pages_file);
        self
    }
}
