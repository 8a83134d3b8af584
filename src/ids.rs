//! Node identity and id generation.
//!
//! Every addressable unit produced by the pipeline (sections, paragraphs,
//! statistics blocks, pages, the document root) is a node with a string id.
//! Ids are handed out by [`IdGenerator`], a per-run service backed by a
//! single monotonically increasing counter shared across all node kinds, so
//! an id is unique across the whole run regardless of its kind prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the document tree.
///
/// Ids use the format `<kind>_<counter>` (e.g. `section_1`, `para_2`),
/// except for the fixed root id `root`. The numeric suffix carries no
/// meaning beyond assignment order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// The fixed id of the document root node.
    pub fn root() -> Self {
        NodeId("root".to_string())
    }

    /// A node id from a raw string.
    ///
    /// Used for fixed bookkeeping ids (e.g. stage statistics nodes) and when
    /// reading artifacts back; generated ids come from [`IdGenerator`].
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// The id of the page with the given 1-based page number.
    pub fn page(page_number: usize) -> Self {
        NodeId(format!("page_{page_number}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root id.
    pub fn is_root(&self) -> bool {
        self.0 == "root"
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a generated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A named section of the source document
    Section,
    /// A single paragraph within a section
    Paragraph,
    /// A stage statistics block
    Statistics,
    /// A rendered page
    Page,
}

impl NodeKind {
    /// Id prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Paragraph => "para",
            NodeKind::Statistics => "stats",
            NodeKind::Page => "page",
        }
    }
}

/// Id generator scoped to one pipeline run.
///
/// All kinds draw from the same counter, so ids are globally unique within
/// the run and their numeric suffixes reflect discovery order across kinds.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// A fresh generator. The counter starts at 1; `root` is not counted.
    pub fn new() -> Self {
        IdGenerator { next: 1 }
    }

    /// Hand out the next id for the given kind, consuming one counter value.
    pub fn next_id(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(format!("{}_{}", kind.prefix(), self.next));
        self.next += 1;
        id
    }

    /// An id stamped with the current counter value without consuming it.
    ///
    /// The segmenter's statistics node uses this so that its id suffix
    /// equals the reported `total_nodes` high-water mark.
    pub fn stamp(&self, kind: NodeKind) -> NodeId {
        NodeId(format!("{}_{}", kind.prefix(), self.next))
    }

    /// Counter high-water mark: one past the last consumed value.
    pub fn high_water(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
