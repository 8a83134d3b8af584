//! Run the textmill pipeline over a source document.
//!
//! Usage:
//!   cargo run --bin textmill -- --source memo.txt --toc toc.json
//!   cargo run --bin textmill -- --stage paginate --target-words 200
//!
//! With `--stage all` (the default) the source text and TOC spec are read
//! and all four artifacts are written. A single stage reads its input
//! artifact from the configured filename chain instead, so stages can be
//! re-run independently.

use textmill::artifact;
use textmill::pipeline::{index, paginate, sectionize, segment};
use textmill::pipeline::{
    IndexedDocument, PaginatedDocument, Pipeline, SectionedDocument, SegmentedDocument,
};
use textmill::{DocumentInfo, PipelineConfig, Result, SourceDocument, TocSpec};

struct CliConfig {
    source: String,
    toc: String,
    stage: String,
    pipeline: PipelineConfig,
}

impl CliConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut source = "document.txt".to_string();
        let mut toc = "toc.json".to_string();
        let mut stage = "all".to_string();
        let mut document = DocumentInfo::default();
        let mut pipeline = PipelineConfig::default();

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--source" | "--toc" | "--stage" | "--target-words" | "--output-dir"
                | "--title" | "--author" | "--doc-version" | "--last-updated" => {
                    let Some(value) = args.get(i + 1) else {
                        eprintln!("Missing value for {flag}");
                        std::process::exit(2);
                    };
                    match flag {
                        "--source" => source = value.clone(),
                        "--toc" => toc = value.clone(),
                        "--stage" => stage = value.clone(),
                        "--target-words" => match value.parse() {
                            Ok(n) => pipeline.target_words_per_page = n,
                            Err(_) => {
                                eprintln!("Invalid --target-words value: {value}");
                                std::process::exit(2);
                            }
                        },
                        "--output-dir" => pipeline = pipeline.with_output_dir(value),
                        "--title" => document.title = value.clone(),
                        "--author" => document.author = value.clone(),
                        "--doc-version" => document.version = value.clone(),
                        "--last-updated" => document.last_updated = value.clone(),
                        _ => unreachable!(),
                    }
                    i += 2;
                }
                _ => {
                    eprintln!("Unknown argument: {flag}");
                    print_usage();
                    std::process::exit(2);
                }
            }
        }

        pipeline.document = document;
        CliConfig {
            source,
            toc,
            stage,
            pipeline,
        }
    }
}

fn print_usage() {
    println!("Usage: textmill [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --source FILE        Source text document (default: document.txt)");
    println!("  --toc FILE           TOC spec JSON: [{{\"name\", \"markers\"}}] (default: toc.json)");
    println!("  --stage STAGE        all | sectionize | segment | index | paginate (default: all)");
    println!("  --target-words N     Pagination word budget (default: 250)");
    println!("  --output-dir DIR     Directory for the artifact filename chain");
    println!("  --title TEXT         Document title recorded in artifact metadata");
    println!("  --author TEXT        Document author");
    println!("  --doc-version TEXT   Document version string");
    println!("  --last-updated TEXT  Document last-updated marker");
}

fn main() {
    env_logger::init();
    let config = CliConfig::from_args();
    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &CliConfig) -> Result<()> {
    let config = &cli.pipeline;
    match cli.stage.as_str() {
        "all" => {
            let source = load_source(cli)?;
            let toc = load_toc(cli)?;
            let output = Pipeline::with_config(config.clone()).run_to_disk(&source, &toc)?;
            print_section_summary(&output.sectioned);
            print_segment_summary(&output.segmented);
            print_pagination_summary(&output.paginated);
            print_index_summary(&output.indexed);
        }
        "sectionize" => {
            let source = load_source(cli)?;
            let toc = load_toc(cli)?;
            let sectioned = sectionize::sectionize(&source, &toc);
            artifact::write_json(&sectioned, &config.sections_file)?;
            print_section_summary(&sectioned);
        }
        "segment" => {
            let sectioned: SectionedDocument = artifact::read_json(&config.sections_file)?;
            let segmented = segment::segment(&sectioned, &config.sections_file);
            artifact::write_json(&segmented, &config.paragraphs_file)?;
            print_segment_summary(&segmented);
        }
        "paginate" => {
            let segmented: SegmentedDocument = artifact::read_json(&config.paragraphs_file)?;
            let paginated = paginate::paginate(
                &segmented,
                config.target_words_per_page,
                &config.paragraphs_file,
            );
            artifact::write_json(&paginated, &config.pages_file)?;
            print_pagination_summary(&paginated);
        }
        "index" => {
            let segmented: SegmentedDocument = artifact::read_json(&config.paragraphs_file)?;
            let pages: Option<PaginatedDocument> = artifact::read_json_opt(&config.pages_file)?;
            if pages.is_none() {
                log::warn!(
                    "{} not found, paragraph-to-page mapping will be empty",
                    config.pages_file
                );
            }
            let indexed = index::index(&segmented, pages.as_ref(), &config.paragraphs_file);
            artifact::write_json(&indexed, &config.index_file)?;
            print_index_summary(&indexed);
        }
        other => {
            eprintln!("Unknown stage: {other}");
            print_usage();
            std::process::exit(2);
        }
    }
    Ok(())
}

fn load_source(cli: &CliConfig) -> Result<SourceDocument> {
    SourceDocument::open(cli.pipeline.document.clone(), &cli.source)
}

fn load_toc(cli: &CliConfig) -> Result<TocSpec> {
    let json = std::fs::read_to_string(&cli.toc)?;
    TocSpec::from_json(&json)
}

fn print_section_summary(doc: &SectionedDocument) {
    let stats = &doc.statistics;
    println!("Parsed {} sections", stats.total_sections);
    println!("Total words: {}", stats.total_words);
    println!("Sections found: {:?}", stats.sections_found);
    if !stats.sections_missing.is_empty() {
        println!("Sections missing: {:?}", stats.sections_missing);
    }
}

fn print_segment_summary(doc: &SegmentedDocument) {
    let stats = &doc.statistics;
    println!("\nProcessed {} sections", stats.total_sections);
    println!("Total paragraphs: {}", stats.total_paragraphs);
    println!("Total words: {}", stats.total_words);
    println!("Total nodes: {}", stats.total_nodes);
    println!(
        "Average paragraphs per section: {}",
        stats.average_paragraphs_per_section
    );
    println!(
        "Average words per paragraph: {}",
        stats.average_words_per_paragraph
    );
}

fn print_index_summary(doc: &IndexedDocument) {
    let stats = &doc.statistics;
    println!("\nWord Index Analysis:");
    println!("  Unique meaningful words: {}", stats.unique_meaningful_words);
    println!("  Total word instances: {}", stats.total_word_instances);
    println!("  Stop words excluded: {}", stats.stop_words_excluded);

    println!("\nWord frequency distribution:");
    let buckets = &stats.words_by_frequency;
    println!("  1 occurrence: {} words", buckets.one);
    println!("  2-5 occurrences: {} words", buckets.two_to_five);
    println!("  6-10 occurrences: {} words", buckets.six_to_ten);
    println!("  11+ occurrences: {} words", buckets.eleven_plus);

    println!("\nTop 10 most common words:");
    for (word, count) in stats.most_common_words.iter().take(10) {
        println!("  '{word}': appears in {count} nodes");
    }

    if doc.paragraph_to_page_mapping.is_empty() {
        println!("\nParagraph-to-page mapping: empty (no pagination artifact)");
    } else {
        println!(
            "\nParagraph-to-page mapping: {} paragraphs",
            doc.paragraph_to_page_mapping.len()
        );
    }
}

fn print_pagination_summary(doc: &PaginatedDocument) {
    let stats = &doc.statistics;
    println!("\nPagination Analysis:");
    println!("  Total pages: {}", stats.total_pages);
    println!("  Target words per page: {}", stats.target_words_per_page);
    println!("  Actual words per page:");
    println!("    Min: {}", stats.actual_words_per_page.min);
    println!("    Max: {}", stats.actual_words_per_page.max);
    println!("    Average: {}", stats.actual_words_per_page.average);

    println!("\nContent distribution:");
    let dist = &stats.content_distribution;
    println!("  Pages with TOC: {}", dist.pages_with_toc);
    println!("  Pages with section titles: {}", dist.pages_with_section_titles);
    println!("  Pages with only paragraphs: {}", dist.pages_with_only_paragraphs);
    println!(
        "\nPages with multiple sections: {}",
        stats.pages_with_multiple_sections
    );

    println!("\nTable of Contents:");
    for entry in doc.table_of_contents.iter().take(5) {
        println!("  {}: page {}", entry.section_name, entry.page_number);
    }
    if doc.table_of_contents.len() > 5 {
        println!(
            "  ... and {} more sections",
            doc.table_of_contents.len() - 5
        );
    }
}
