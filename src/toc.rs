//! Declarative table-of-contents specification.
//!
//! Section boundaries are recognized by exact literal markers. Historic
//! documents drift in spelling and punctuation (`CH1.` vs `CH1:`, casing of
//! `this work`), so each canonical section name carries an ordered list of
//! accepted marker variants. Adding a newly observed variant is a data
//! change here, not a code change in the sectionizer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One canonical section with its accepted boundary markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocEntry {
    /// Canonical section name, the key used across all stages
    pub name: String,
    /// Literal marker texts accepted as this section's boundary line
    pub markers: Vec<String>,
}

impl TocEntry {
    /// An entry accepting a single marker.
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        TocEntry {
            name: name.into(),
            markers: vec![marker.into()],
        }
    }

    /// An entry accepting several marker variants.
    pub fn with_markers(name: impl Into<String>, markers: Vec<String>) -> Self {
        TocEntry {
            name: name.into(),
            markers,
        }
    }
}

/// Ordered table of canonical sections and their boundary markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TocSpec {
    entries: Vec<TocEntry>,
}

impl TocSpec {
    /// Build a spec from ordered entries.
    pub fn new(entries: Vec<TocEntry>) -> Self {
        TocSpec { entries }
    }

    /// Parse a spec from its JSON form: a list of `{name, markers}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TocSpec = serde_json::from_str(json)?;
        if spec.entries.is_empty() {
            return Err(Error::InvalidTocSpec("no entries".to_string()));
        }
        for entry in &spec.entries {
            if entry.markers.is_empty() {
                return Err(Error::InvalidTocSpec(format!(
                    "section '{}' has no markers",
                    entry.name
                )));
            }
        }
        Ok(spec)
    }

    /// The entries in table-of-contents order.
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Canonical section names in table-of-contents order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Match a candidate line against every marker, in table order.
    ///
    /// Markers are compared by equality, never by substring. Returns the
    /// canonical name of the first section with a matching marker.
    pub fn match_marker(&self, candidate: &str) -> Option<&str> {
        for entry in &self.entries {
            if entry.markers.iter().any(|m| m == candidate) {
                return Some(&entry.name);
            }
        }
        None
    }
}
