//! Paginator integration tests.
//!
//! Covers the word-budget invariant, content ordering across pages, TOC
//! resolution, page linking, and the Stage 4 artifact wire format.

use textmill::pipeline::paginate::{paginate, PageItem, PaginatedDocument};
use textmill::pipeline::sectionize::sectionize;
use textmill::pipeline::segment::{segment, SegmentedDocument};
use textmill::toc::{TocEntry, TocSpec};
use textmill::{DocumentInfo, NodeId, SourceDocument};

fn toc() -> TocSpec {
    TocSpec::new(vec![
        TocEntry::new("Alpha", "__Alpha__"),
        TocEntry::new("Beta", "__Beta__"),
        TocEntry::new("Gamma", "__Gamma__"),
    ])
}

fn segmented(text: &str) -> SegmentedDocument {
    let source = SourceDocument::from_text(DocumentInfo::titled("T"), "test.txt", text);
    segment(&sectionize(&source, &toc()), "sections.json")
}

fn sample_text() -> String {
    let mut text = String::from("__Alpha__\n");
    for i in 0..12 {
        text.push_str(&format!("alpha paragraph number {i} with several words inside\n"));
    }
    text.push_str("__Beta__\nshort one\n__Gamma__\n");
    for i in 0..5 {
        text.push_str(&format!("gamma line {i} closing out the memo\n"));
    }
    text
}

/// Budget invariant: a page may exceed the budget only when it carries an
/// atomic item that alone exceeds the budget.
fn assert_budget(doc: &PaginatedDocument, budget: usize) {
    for page in doc.pages.values() {
        if page.word_count <= budget {
            continue;
        }
        let has_oversized_item = page.content.iter().any(|item| {
            let words = match item {
                PageItem::TableOfContents { content } => {
                    content.title.split_whitespace().count()
                }
                PageItem::SectionTitle { content, .. } => {
                    content.title.split_whitespace().count()
                }
                PageItem::Paragraph { content, .. } => content.word_count,
            };
            words > budget
        });
        assert!(
            has_oversized_item,
            "page {} exceeds budget {} without an oversized item",
            page.page_number, budget
        );
    }
}

#[test]
fn test_budget_respected_across_budgets() {
    for budget in [5, 10, 25, 250] {
        let doc = paginate(&segmented(&sample_text()), budget, "paragraphs.json");
        assert_budget(&doc, budget);
    }
}

#[test]
fn test_concatenated_pages_reproduce_source_order() {
    let stage2 = segmented(&sample_text());
    let doc = paginate(&stage2, 20, "paragraphs.json");

    // Collect source node ids of titles and paragraphs in page order.
    let mut placed: Vec<NodeId> = Vec::new();
    for page_id in &doc.page_order {
        for item in &doc.pages[page_id].content {
            match item {
                PageItem::SectionTitle { source_node_id, .. }
                | PageItem::Paragraph { source_node_id, .. } => {
                    placed.push(source_node_id.clone())
                }
                PageItem::TableOfContents { .. } => {}
            }
        }
    }

    let mut expected: Vec<NodeId> = Vec::new();
    for section in stage2.sections.values() {
        expected.push(section.id.clone());
        for paragraph in &section.paragraphs {
            expected.push(paragraph.id.clone());
        }
    }
    assert_eq!(placed, expected);
}

#[test]
fn test_toc_resolves_found_sections_in_canonical_order() {
    // Gamma missing from the source; Beta discovered before Alpha.
    let doc = paginate(
        &segmented("__Beta__\nbeta words here\n__Alpha__\nalpha words"),
        250,
        "paragraphs.json",
    );

    let names: Vec<&str> = doc
        .table_of_contents
        .iter()
        .map(|e| e.section_name.as_str())
        .collect();
    // Canonical TOC order, not discovery order; missing sections skipped.
    assert_eq!(names, vec!["Alpha", "Beta"]);
    for entry in &doc.table_of_contents {
        assert_eq!(entry.page_number, doc.section_start_pages[&entry.section_name]);
        assert_eq!(entry.page_id, NodeId::page(entry.page_number));
    }
}

#[test]
fn test_page_linking_and_order() {
    let doc = paginate(&segmented(&sample_text()), 15, "paragraphs.json");
    assert!(doc.pages.len() >= 3);
    assert_eq!(doc.page_order.len(), doc.pages.len());

    for (i, page_id) in doc.page_order.iter().enumerate() {
        let page = &doc.pages[page_id];
        assert_eq!(page.page_number, i + 1);
        assert_eq!(page.id, NodeId::page(i + 1));
        match doc.page_order.get(i + 1) {
            Some(next) => assert_eq!(page.next_page.as_ref(), Some(next)),
            None => assert!(page.next_page.is_none()),
        }
    }
}

#[test]
fn test_toc_block_word_count_added_to_first_page() {
    let stage2 = segmented("__Alpha__\none two three");
    let doc = paginate(&stage2, 250, "paragraphs.json");

    let first = &doc.pages[&NodeId::page(1)];
    // "Alpha" + 3 paragraph words + "Table of Contents"
    assert_eq!(first.word_count, 1 + 3 + 3);
    assert!(matches!(first.content[0], PageItem::TableOfContents { .. }));
}

#[test]
fn test_multi_section_page_statistics() {
    // Three tiny sections share one page under a generous budget.
    let doc = paginate(
        &segmented("__Alpha__\na b\n__Beta__\nc d\n__Gamma__\ne f"),
        250,
        "paragraphs.json",
    );
    assert_eq!(doc.statistics.total_pages, 1);
    assert_eq!(doc.statistics.pages_with_multiple_sections, 1);
    assert_eq!(doc.statistics.content_distribution.pages_with_toc, 1);
    assert_eq!(doc.statistics.content_distribution.pages_with_section_titles, 1);
    assert_eq!(doc.statistics.content_distribution.pages_with_only_paragraphs, 0);
}

#[test]
fn test_words_per_page_statistics() {
    let doc = paginate(&segmented(&sample_text()), 20, "paragraphs.json");
    let stats = &doc.statistics.actual_words_per_page;

    let counts: Vec<usize> = doc.pages.values().map(|p| p.word_count).collect();
    assert_eq!(stats.min, *counts.iter().min().unwrap());
    assert_eq!(stats.max, *counts.iter().max().unwrap());
    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    assert!((stats.average - mean).abs() < 0.05 + f64::EPSILON);
}

#[test]
fn test_stage4_wire_format() {
    let stage2 = segmented("__Alpha__\nhello world memo");
    let doc = paginate(&stage2, 250, "paragraphs.json");
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["metadata"]["parsing_step"], "paginate");
    assert_eq!(json["metadata"]["target_words_per_page"], 250);
    assert_eq!(json["page_order"][0], "page_1");

    let page = &json["pages"]["page_1"];
    assert_eq!(page["id"], "page_1");
    assert_eq!(page["parent_id"], "root");
    assert_eq!(page["page_number"], 1);
    assert_eq!(page["next_page"], serde_json::Value::Null);

    assert_eq!(json["section_start_pages"]["Alpha"], 1);
    assert_eq!(json["table_of_contents"][0]["section_name"], "Alpha");
    assert_eq!(json["table_of_contents"][0]["page_number"], 1);
    assert_eq!(json["table_of_contents"][0]["page_id"], "page_1");
    assert_eq!(json["statistics"]["id"], "stats_pages");
}
