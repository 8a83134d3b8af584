//! Stage 4: re-flow sections and paragraphs into word-budgeted pages.
//!
//! A single greedy pass walks sections in their discovery order and packs
//! content items onto pages up to a target word budget. Content items are
//! atomic: a paragraph or section title is never split, so a single item
//! wider than the budget legitimately produces an over-budget page. The
//! table of contents is resolved to starting page numbers and prepended to
//! the first page.

use crate::document::Metadata;
use crate::ids::NodeId;
use crate::pipeline::segment::SegmentedDocument;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Stage name recorded in artifact metadata.
pub const STAGE_NAME: &str = "paginate";

const TOC_TITLE: &str = "Table of Contents";

/// A table-of-contents entry resolved to its starting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocPageEntry {
    /// Canonical section name
    pub section_name: String,
    /// 1-based page number the section starts on
    pub page_number: usize,
    /// Id of that page
    pub page_id: NodeId,
}

/// Payload of a rendered table-of-contents block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocBlock {
    /// Block heading
    pub title: String,
    /// Resolved entries in canonical order
    pub sections: Vec<TocPageEntry>,
}

/// Payload of a section-title marker on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionTitleBlock {
    /// Section title text
    pub title: String,
    /// Canonical section name
    pub section_name: String,
}

/// Payload of a paragraph placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphBlock {
    /// Paragraph text
    pub text: String,
    /// Whitespace-delimited token count of `text`
    pub word_count: usize,
    /// Approximate source line number carried over from Stage 2
    pub line_number: usize,
    /// 0-based position within the owning section
    pub paragraph_index: usize,
}

/// One atomic content item on a page.
///
/// Items carry their own payload variant; paragraph and title items also
/// keep a back-reference to the Stage 2 node they were produced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageItem {
    /// The resolved table of contents, first page only
    #[serde(rename = "table_of_contents")]
    TableOfContents {
        /// Block payload
        content: TocBlock,
    },
    /// A section's title marking where the section starts
    #[serde(rename = "section_title")]
    SectionTitle {
        /// Block payload
        content: SectionTitleBlock,
        /// Id of the source section node
        source_node_id: NodeId,
    },
    /// A paragraph of body text
    #[serde(rename = "paragraph")]
    Paragraph {
        /// Block payload
        content: ParagraphBlock,
        /// Id of the source paragraph node
        source_node_id: NodeId,
    },
}

/// A capacity-bounded page of content items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique page id (`page_<page_number>`)
    pub id: NodeId,
    /// Always the root id
    pub parent_id: NodeId,
    /// 1-based sequential page number
    pub page_number: usize,
    /// Sum of contained item word counts
    pub word_count: usize,
    /// Content items in reading order
    pub content: Vec<PageItem>,
    /// Id of the following page, `null` on the last page
    pub next_page: Option<NodeId>,
}

/// Words-per-page spread over the produced pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsPerPage {
    /// Smallest page word count
    pub min: usize,
    /// Largest page word count
    pub max: usize,
    /// Mean page word count, rounded to 1 decimal
    pub average: f64,
}

/// How content kinds are distributed across pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDistribution {
    /// Pages carrying the table-of-contents block
    pub pages_with_toc: usize,
    /// Pages carrying at least one section title
    pub pages_with_section_titles: usize,
    /// Pages consisting solely of paragraphs
    pub pages_with_only_paragraphs: usize,
}

/// Paginator statistics; itself a node in the document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStatistics {
    /// This statistics node's id
    pub id: NodeId,
    /// Always the root id
    pub parent_id: NodeId,
    /// Number of pages produced
    pub total_pages: usize,
    /// Number of sections placed
    pub total_sections: usize,
    /// The configured word budget
    pub target_words_per_page: usize,
    /// Words-per-page spread
    pub actual_words_per_page: WordsPerPage,
    /// Pages carrying titles from more than one distinct section
    pub pages_with_multiple_sections: usize,
    /// Distribution of content kinds across pages
    pub content_distribution: ContentDistribution,
}

/// Output of the paginator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedDocument {
    /// Artifact metadata block, including the word budget
    pub metadata: Metadata,
    /// Table of contents resolved to starting pages, in canonical order
    pub table_of_contents: Vec<TocPageEntry>,
    /// Section name → 1-based starting page number
    pub section_start_pages: IndexMap<String, usize>,
    /// Pages keyed by id, in page order
    pub pages: IndexMap<NodeId, Page>,
    /// Page ids in reading order
    pub page_order: Vec<NodeId>,
    /// Stage statistics
    pub statistics: PageStatistics,
}

/// Accumulates content items onto the page under construction.
struct PageAccumulator {
    pages: Vec<Page>,
    content: Vec<PageItem>,
    word_count: usize,
}

impl PageAccumulator {
    fn new() -> Self {
        PageAccumulator {
            pages: Vec::new(),
            content: Vec::new(),
            word_count: 0,
        }
    }

    /// 1-based number of the page currently being filled.
    fn current_page_number(&self) -> usize {
        self.pages.len() + 1
    }

    fn push(&mut self, item: PageItem, words: usize) {
        self.content.push(item);
        self.word_count += words;
    }

    /// Close the page under construction, if it has any content.
    fn flush(&mut self) {
        if self.content.is_empty() {
            return;
        }
        let page_number = self.current_page_number();
        self.pages.push(Page {
            id: NodeId::page(page_number),
            parent_id: NodeId::root(),
            page_number,
            word_count: self.word_count,
            content: std::mem::take(&mut self.content),
            next_page: None,
        });
        self.word_count = 0;
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        // Forward-link the pages; the last page keeps next_page = None.
        for i in 1..self.pages.len() {
            let next = self.pages[i].id.clone();
            self.pages[i - 1].next_page = Some(next);
        }
        self.pages
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Re-flow the segmented document into pages under the given word budget.
pub fn paginate(
    doc: &SegmentedDocument,
    target_words_per_page: usize,
    previous_step: &str,
) -> PaginatedDocument {
    let mut acc = PageAccumulator::new();
    let mut section_start_pages: IndexMap<String, usize> = IndexMap::new();

    for (name, section) in &doc.sections {
        let title_words = section.title.split_whitespace().count();
        let first_para_words = section.paragraphs.first().map(|p| p.word_count).unwrap_or(0);

        // A section title stays with its first paragraph: break when the
        // pair no longer fits the open page. An empty page takes the title
        // no matter the budget.
        if acc.word_count > 0
            && acc.word_count + title_words + first_para_words > target_words_per_page
        {
            acc.flush();
        }
        section_start_pages.insert(name.clone(), acc.current_page_number());
        acc.push(
            PageItem::SectionTitle {
                content: SectionTitleBlock {
                    title: section.title.clone(),
                    section_name: name.clone(),
                },
                source_node_id: section.id.clone(),
            },
            title_words,
        );

        for (i, paragraph) in section.paragraphs.iter().enumerate() {
            // An oversized first paragraph joins its title: breaking could
            // not bring the page under budget anyway, and the title must
            // not be orphaned from the only content of its section's page.
            let keep_with_title = i == 0 && paragraph.word_count > target_words_per_page;
            if !keep_with_title
                && acc.word_count + paragraph.word_count > target_words_per_page
            {
                acc.flush();
            }
            // Atomic: a paragraph is never split, so a page holding one
            // oversized paragraph legitimately exceeds the budget.
            acc.push(
                PageItem::Paragraph {
                    content: ParagraphBlock {
                        text: paragraph.text.clone(),
                        word_count: paragraph.word_count,
                        line_number: paragraph.line_number,
                        paragraph_index: paragraph.paragraph_index,
                    },
                    source_node_id: paragraph.id.clone(),
                },
                paragraph.word_count,
            );
        }
    }

    let mut pages = acc.finish();
    debug!("paginated into {} pages", pages.len());

    // Resolve the TOC against the canonical ordering, found sections only.
    let table_of_contents: Vec<TocPageEntry> = doc
        .table_of_contents
        .iter()
        .filter_map(|name| {
            section_start_pages.get(name).map(|&page_number| TocPageEntry {
                section_name: name.clone(),
                page_number,
                page_id: NodeId::page(page_number),
            })
        })
        .collect();

    if let Some(first) = pages.first_mut() {
        if !first.content.is_empty() {
            first.content.insert(
                0,
                PageItem::TableOfContents {
                    content: TocBlock {
                        title: TOC_TITLE.to_string(),
                        sections: table_of_contents.clone(),
                    },
                },
            );
            first.word_count += TOC_TITLE.split_whitespace().count();
        }
    }

    let statistics = build_statistics(&pages, section_start_pages.len(), target_words_per_page);

    let mut metadata = doc.metadata.derive(STAGE_NAME, previous_step);
    metadata.target_words_per_page = Some(target_words_per_page);

    PaginatedDocument {
        metadata,
        table_of_contents,
        section_start_pages,
        page_order: pages.iter().map(|p| p.id.clone()).collect(),
        pages: pages.into_iter().map(|p| (p.id.clone(), p)).collect(),
        statistics,
    }
}

fn build_statistics(
    pages: &[Page],
    total_sections: usize,
    target_words_per_page: usize,
) -> PageStatistics {
    let word_counts: Vec<usize> = pages.iter().map(|p| p.word_count).collect();
    let actual = WordsPerPage {
        min: word_counts.iter().copied().min().unwrap_or(0),
        max: word_counts.iter().copied().max().unwrap_or(0),
        average: if pages.is_empty() {
            0.0
        } else {
            round1(word_counts.iter().sum::<usize>() as f64 / pages.len() as f64)
        },
    };

    let pages_with_multiple_sections = pages
        .iter()
        .filter(|page| {
            let mut names: Vec<&str> = page
                .content
                .iter()
                .filter_map(|item| match item {
                    PageItem::SectionTitle { content, .. } => Some(content.section_name.as_str()),
                    _ => None,
                })
                .collect();
            names.sort_unstable();
            names.dedup();
            names.len() > 1
        })
        .count();

    let content_distribution = ContentDistribution {
        pages_with_toc: pages
            .iter()
            .filter(|p| {
                p.content
                    .iter()
                    .any(|i| matches!(i, PageItem::TableOfContents { .. }))
            })
            .count(),
        pages_with_section_titles: pages
            .iter()
            .filter(|p| {
                p.content
                    .iter()
                    .any(|i| matches!(i, PageItem::SectionTitle { .. }))
            })
            .count(),
        pages_with_only_paragraphs: pages
            .iter()
            .filter(|p| {
                p.content
                    .iter()
                    .all(|i| matches!(i, PageItem::Paragraph { .. }))
            })
            .count(),
    };

    PageStatistics {
        id: NodeId::new("stats_pages"),
        parent_id: NodeId::root(),
        total_pages: pages.len(),
        total_sections,
        target_words_per_page,
        actual_words_per_page: actual,
        pages_with_multiple_sections,
        content_distribution,
    }
}
