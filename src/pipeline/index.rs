//! Stage 3: inverted word index and node path index.
//!
//! The indexer builds a word → node-id index over section titles and
//! paragraph texts, a root-to-node path for every id in the Stage 2
//! document, and (when the pagination artifact is available) a paragraph →
//! page cross-reference. The pagination input is an injected optional
//! collaborator; its absence is a first-class state, not an error.

use crate::document::Metadata;
use crate::ids::NodeId;
use crate::pipeline::paginate::{PageItem, PaginatedDocument};
use crate::pipeline::segment::SegmentedDocument;
use crate::pipeline::stopwords::STOP_WORDS;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Stage name recorded in artifact metadata.
pub const STAGE_NAME: &str = "index";

/// Minimum cleaned-token length (exclusive) for a word to be indexed.
const MIN_WORD_LEN: usize = 2;

/// How many entries the most-common-words statistic keeps.
const TOP_WORDS: usize = 20;

lazy_static! {
    /// Everything that is not a word character, stripped before indexing
    static ref NON_WORD: Regex = Regex::new(r"[^\w]").unwrap();
}

/// Clean a raw token: lowercase, then strip all non-word characters.
fn clean_word(raw: &str) -> String {
    NON_WORD.replace_all(&raw.to_lowercase(), "").into_owned()
}

/// Extract the indexable words of a text: cleaned tokens longer than two
/// characters that are not stop words. Order and repeats are preserved.
fn meaningful_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|token| {
            let cleaned = clean_word(token);
            if cleaned.chars().count() > MIN_WORD_LEN && !STOP_WORDS.contains(cleaned.as_str()) {
                Some(cleaned)
            } else {
                None
            }
        })
        .collect()
}

/// Word frequency distribution buckets, by number of containing nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyBuckets {
    /// Words found in exactly one node
    #[serde(rename = "1_occurrence")]
    pub one: usize,
    /// Words found in two to five nodes
    #[serde(rename = "2-5_occurrences")]
    pub two_to_five: usize,
    /// Words found in six to ten nodes
    #[serde(rename = "6-10_occurrences")]
    pub six_to_ten: usize,
    /// Words found in more than ten nodes
    #[serde(rename = "11+_occurrences")]
    pub eleven_plus: usize,
}

/// Indexer statistics; itself a node in the document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatistics {
    /// This statistics node's id
    pub id: NodeId,
    /// Always the root id
    pub parent_id: NodeId,
    /// Section count carried over from Stage 2
    pub total_sections: usize,
    /// Paragraph count carried over from Stage 2
    pub total_paragraphs: usize,
    /// Id-counter high-water mark carried over from Stage 2
    pub total_nodes: u64,
    /// Number of distinct indexed words
    pub unique_meaningful_words: usize,
    /// Total meaningful-token occurrences across paragraph texts
    pub total_word_instances: usize,
    /// Size of the stop-word set
    pub stop_words_excluded: usize,
    /// Top words by containing-node count, descending; ties break on the
    /// word ascending so repeated runs are identical
    pub most_common_words: Vec<(String, usize)>,
    /// Distribution of words by containing-node count
    pub words_by_frequency: FrequencyBuckets,
}

/// Output of the indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Artifact metadata block
    pub metadata: Metadata,
    /// Word → ids of the nodes containing it (sorted, set semantics)
    pub word_index: IndexMap<String, BTreeSet<NodeId>>,
    /// Node id → ancestor chain from the root to the node inclusive
    pub node_path_index: IndexMap<NodeId, Vec<NodeId>>,
    /// Paragraph id → id of the page containing it; empty without pagination
    pub paragraph_to_page_mapping: IndexMap<NodeId, NodeId>,
    /// Stage statistics
    pub statistics: IndexStatistics,
}

/// Build the word, path, and page cross-reference indices.
///
/// `pages` is the optionally available Stage 4 artifact. When `None`, the
/// paragraph-to-page mapping is empty; the caller decides how its absence is
/// reported.
pub fn index(
    doc: &SegmentedDocument,
    pages: Option<&PaginatedDocument>,
    previous_step: &str,
) -> IndexedDocument {
    let mut word_index: IndexMap<String, BTreeSet<NodeId>> = IndexMap::new();
    let mut total_word_instances = 0usize;

    for section in doc.sections.values() {
        for word in meaningful_words(&section.title) {
            word_index.entry(word).or_default().insert(section.id.clone());
        }
        for paragraph in &section.paragraphs {
            let words = meaningful_words(&paragraph.text);
            total_word_instances += words.len();
            for word in words {
                word_index.entry(word).or_default().insert(paragraph.id.clone());
            }
        }
    }
    debug!(
        "word index: {} distinct words, {} instances",
        word_index.len(),
        total_word_instances
    );

    let node_path_index = build_path_index(doc);
    let paragraph_to_page_mapping = pages
        .map(build_page_mapping)
        .unwrap_or_default();

    let statistics = IndexStatistics {
        id: NodeId::new("stats_index"),
        parent_id: NodeId::root(),
        total_sections: doc.statistics.total_sections,
        total_paragraphs: doc.statistics.total_paragraphs,
        total_nodes: doc.statistics.total_nodes,
        unique_meaningful_words: word_index.len(),
        total_word_instances,
        stop_words_excluded: STOP_WORDS.len(),
        most_common_words: most_common_words(&word_index),
        words_by_frequency: frequency_buckets(&word_index),
    };

    IndexedDocument {
        metadata: doc.metadata.derive(STAGE_NAME, previous_step),
        word_index,
        node_path_index,
        paragraph_to_page_mapping,
        statistics,
    }
}

/// Root-to-node paths for every id in the Stage 2 document.
///
/// Purely structural: the tree is at most three levels deep
/// (root → section → paragraph), with the statistics node directly under
/// the root.
fn build_path_index(doc: &SegmentedDocument) -> IndexMap<NodeId, Vec<NodeId>> {
    let root = doc.metadata.root_id();

    let mut paths: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    paths.insert(root.clone(), vec![root.clone()]);
    paths.insert(
        doc.statistics.id.clone(),
        vec![root.clone(), doc.statistics.id.clone()],
    );

    for section in doc.sections.values() {
        let section_path = vec![root.clone(), section.id.clone()];
        paths.insert(section.id.clone(), section_path.clone());
        for paragraph in &section.paragraphs {
            let mut path = section_path.clone();
            path.push(paragraph.id.clone());
            paths.insert(paragraph.id.clone(), path);
        }
    }
    paths
}

/// Paragraph → page mapping read from the pagination artifact.
fn build_page_mapping(pages: &PaginatedDocument) -> IndexMap<NodeId, NodeId> {
    let mut mapping = IndexMap::new();
    for (page_id, page) in &pages.pages {
        for item in &page.content {
            if let PageItem::Paragraph { source_node_id, .. } = item {
                mapping.insert(source_node_id.clone(), page_id.clone());
            }
        }
    }
    mapping
}

fn most_common_words(word_index: &IndexMap<String, BTreeSet<NodeId>>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = word_index
        .iter()
        .map(|(word, nodes)| (word.clone(), nodes.len()))
        .collect();
    counts.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
    counts.truncate(TOP_WORDS);
    counts
}

fn frequency_buckets(word_index: &IndexMap<String, BTreeSet<NodeId>>) -> FrequencyBuckets {
    let mut buckets = FrequencyBuckets {
        one: 0,
        two_to_five: 0,
        six_to_ten: 0,
        eleven_plus: 0,
    };
    for nodes in word_index.values() {
        match nodes.len() {
            1 => buckets.one += 1,
            2..=5 => buckets.two_to_five += 1,
            6..=10 => buckets.six_to_ten += 1,
            _ => buckets.eleven_plus += 1,
        }
    }
    buckets
}
