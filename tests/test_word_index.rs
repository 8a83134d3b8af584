//! Indexer integration tests.
//!
//! Covers word-index soundness and completeness, the node path index, the
//! optional paragraph-to-page cross-reference, and the Stage 3 statistics.

use std::collections::BTreeSet;
use textmill::pipeline::index::index;
use textmill::pipeline::paginate::paginate;
use textmill::pipeline::sectionize::sectionize;
use textmill::pipeline::segment::{segment, SegmentedDocument};
use textmill::pipeline::stopwords::STOP_WORDS;
use textmill::toc::{TocEntry, TocSpec};
use textmill::{DocumentInfo, NodeId, SourceDocument};

fn toc() -> TocSpec {
    TocSpec::new(vec![
        TocEntry::new("Ontology Notes", "__Ontology__"),
        TocEntry::new("Memoir", "__Memoir__"),
    ])
}

fn segmented(text: &str) -> SegmentedDocument {
    let source = SourceDocument::from_text(DocumentInfo::titled("T"), "test.txt", text);
    segment(&sectionize(&source, &toc()), "sections.json")
}

fn clean(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

#[test]
fn test_word_index_soundness_and_completeness() {
    let doc = segmented("__Ontology__\nThe ontology describes fashion.\nFashion repeats fashion!\n__Memoir__\nA memoir about ontology.");
    let indexed = index(&doc, None, "paragraphs.json");

    // Soundness: every indexed (word, node) pair is backed by node text.
    for (word, nodes) in &indexed.word_index {
        for node in nodes {
            let text = node_text(&doc, node);
            let tokens: Vec<String> = text.split_whitespace().map(|t| clean(t)).collect();
            assert!(
                tokens.iter().any(|t| t == word),
                "'{word}' indexed to {node} but absent from its text"
            );
        }
    }

    // Completeness: every meaningful token of every node is indexed back to
    // that node.
    for section in doc.sections.values() {
        check_tokens_indexed(&indexed.word_index, &section.title, &section.id);
        for paragraph in &section.paragraphs {
            check_tokens_indexed(&indexed.word_index, &paragraph.text, &paragraph.id);
        }
    }
}

fn node_text(doc: &SegmentedDocument, node: &NodeId) -> String {
    for section in doc.sections.values() {
        if &section.id == node {
            return section.title.clone();
        }
        for paragraph in &section.paragraphs {
            if &paragraph.id == node {
                return paragraph.text.clone();
            }
        }
    }
    panic!("unknown node id {node}");
}

fn check_tokens_indexed(
    word_index: &indexmap::IndexMap<String, BTreeSet<NodeId>>,
    text: &str,
    node: &NodeId,
) {
    for token in text.split_whitespace() {
        let cleaned = clean(token);
        if cleaned.chars().count() > 2 && !STOP_WORDS.contains(cleaned.as_str()) {
            let nodes = word_index
                .get(&cleaned)
                .unwrap_or_else(|| panic!("'{cleaned}' missing from index"));
            assert!(nodes.contains(node), "'{cleaned}' not mapped to {node}");
        }
    }
}

#[test]
fn test_word_membership_is_set_semantics() {
    let doc = segmented("__Ontology__\nfashion fashion fashion");
    let indexed = index(&doc, None, "paragraphs.json");

    let nodes = &indexed.word_index["fashion"];
    assert_eq!(nodes.len(), 1);
    // Occurrences still count individually in the instance total.
    assert_eq!(indexed.statistics.total_word_instances, 3);
}

#[test]
fn test_title_words_index_to_section_not_instances() {
    let doc = segmented("__Ontology__\nplain words");
    let indexed = index(&doc, None, "paragraphs.json");

    // "Ontology Notes" title words map to the section node...
    let nodes = &indexed.word_index["ontology"];
    assert!(nodes.contains(&doc.sections["Ontology Notes"].id));
    // ...but instance counting covers paragraph text only.
    assert_eq!(indexed.statistics.total_word_instances, 2);
}

#[test]
fn test_path_index_covers_every_node() {
    let doc = segmented("__Ontology__\none two three\nfour\n__Memoir__\nfive");
    let indexed = index(&doc, None, "paragraphs.json");
    let root = NodeId::root();

    // Root and statistics nodes.
    assert_eq!(indexed.node_path_index[&root], vec![root.clone()]);
    assert_eq!(
        indexed.node_path_index[&doc.statistics.id],
        vec![root.clone(), doc.statistics.id.clone()]
    );

    // Every section and paragraph has exactly one entry, ending in itself
    // and starting at the root, with length = depth + 1.
    let mut expected = 2;
    for section in doc.sections.values() {
        expected += 1 + section.paragraphs.len();
        let path = &indexed.node_path_index[&section.id];
        assert_eq!(path.len(), 2);
        assert_eq!(path.first(), Some(&root));
        assert_eq!(path.last(), Some(&section.id));
        for paragraph in &section.paragraphs {
            let path = &indexed.node_path_index[&paragraph.id];
            assert_eq!(path.len(), 3);
            assert_eq!(path[0], root);
            assert_eq!(path[1], section.id);
            assert_eq!(path[2], paragraph.id);
        }
    }
    assert_eq!(indexed.node_path_index.len(), expected);
}

#[test]
fn test_cross_reference_with_and_without_pages() {
    let doc = segmented("__Ontology__\nalpha beta gamma\ndelta\n__Memoir__\nepsilon");
    let paginated = paginate(&doc, 3, "paragraphs.json");

    let without = index(&doc, None, "paragraphs.json");
    assert!(without.paragraph_to_page_mapping.is_empty());

    let with = index(&doc, Some(&paginated), "paragraphs.json");
    // Every paragraph node appears exactly once in the mapping.
    let paragraph_count: usize = doc.sections.values().map(|s| s.paragraphs.len()).sum();
    assert_eq!(with.paragraph_to_page_mapping.len(), paragraph_count);
    for (para_id, page_id) in &with.paragraph_to_page_mapping {
        let page = &paginated.pages[page_id];
        assert!(page.content.iter().any(|item| matches!(
            item,
            textmill::pipeline::PageItem::Paragraph { source_node_id, .. }
                if source_node_id == para_id
        )));
    }
}

#[test]
fn test_most_common_words_deterministic_tie_break() {
    // zebra and apple both occur in two nodes; apple sorts first.
    let doc = segmented("__Ontology__\napple zebra\nzebra apple\nunique");
    let indexed = index(&doc, None, "paragraphs.json");

    let top = &indexed.statistics.most_common_words;
    assert_eq!(top[0], ("apple".to_string(), 2));
    assert_eq!(top[1], ("zebra".to_string(), 2));
    assert!(top.iter().any(|(w, n)| w == "unique" && *n == 1));
}

#[test]
fn test_frequency_buckets_partition_vocabulary() {
    let doc = segmented("__Ontology__\nalpha beta\nalpha beta\nalpha unique");
    let indexed = index(&doc, None, "paragraphs.json");

    let buckets = &indexed.statistics.words_by_frequency;
    let total = buckets.one + buckets.two_to_five + buckets.six_to_ten + buckets.eleven_plus;
    assert_eq!(total, indexed.statistics.unique_meaningful_words);
    // alpha in 3 nodes, beta in 2, unique in 1; title words each in 1
    assert_eq!(buckets.two_to_five, 2);
}

#[test]
fn test_stage3_wire_format() {
    let doc = segmented("__Ontology__\nfashion talk");
    let paginated = paginate(&doc, 250, "paragraphs.json");
    let indexed = index(&doc, Some(&paginated), "paragraphs.json");
    let json = serde_json::to_value(&indexed).unwrap();

    assert_eq!(json["metadata"]["parsing_step"], "index");
    assert_eq!(json["metadata"]["previous_step"], "paragraphs.json");
    assert_eq!(json["metadata"]["id"], "root");
    assert_eq!(json["metadata"]["parent_id"], serde_json::Value::Null);

    // word → sorted id list
    assert!(json["word_index"]["fashion"].is_array());
    assert_eq!(json["statistics"]["id"], "stats_index");
    assert_eq!(
        json["statistics"]["stop_words_excluded"],
        STOP_WORDS.len()
    );
    // the mapping serializes as an object keyed by paragraph id
    assert!(json["paragraph_to_page_mapping"].is_object());
}
