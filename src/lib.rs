//! # textmill
//!
//! Converts a single flat text document into a structured, paginated,
//! searchable representation through a four-stage pipeline:
//!
//! 1. **Sectionize** — match boundary markers against a declarative table of
//!    contents and partition the lines into named sections.
//! 2. **Segment** — assign every section and paragraph a unique node id and
//!    split section content into paragraphs.
//! 3. **Index** — build a stop-word-filtered inverted word index and a
//!    root-to-node path index; optionally cross-reference paragraphs to the
//!    pages containing them.
//! 4. **Paginate** — re-flow sections and paragraphs into word-budgeted
//!    pages with a table of contents resolved to page numbers.
//!
//! Each stage is a pure transformation emitting an immutable document; the
//! file boundary between stages is pretty-printed JSON with chained default
//! filenames.
//!
//! ## Quick start
//!
//! ```
//! use textmill::{DocumentInfo, Pipeline, PipelineConfig, SourceDocument};
//! use textmill::toc::{TocEntry, TocSpec};
//!
//! let toc = TocSpec::new(vec![
//!     TocEntry::new("Intro", "__Intro__"),
//!     TocEntry::new("Body", "__Body__"),
//! ]);
//! let source = SourceDocument::from_text(
//!     DocumentInfo::titled("Example"),
//!     "example.txt",
//!     "__Intro__\nHello world foo bar\n__Body__\nMore text here",
//! );
//!
//! let pipeline = Pipeline::with_config(PipelineConfig::default());
//! let output = pipeline.run(&source, &toc);
//! assert_eq!(output.paginated.statistics.total_pages, 1);
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core document model
pub mod config;
pub mod document;
pub mod ids;
pub mod toc;

// The staged transformation pipeline
pub mod pipeline;

// JSON artifact boundaries
pub mod artifact;

pub use config::PipelineConfig;
pub use document::{DocumentInfo, Metadata, SourceDocument};
pub use error::{Error, Result};
pub use ids::{IdGenerator, NodeId, NodeKind};
pub use pipeline::{Pipeline, PipelineOutput};
pub use toc::TocSpec;
