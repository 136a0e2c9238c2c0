//! Raw cross-reference data produced by extraction.

use serde::{Deserialize, Serialize};

use crate::CitationPath;

/// One raw cross-reference: `dependent` references (depends on)
/// `dependency`.
///
/// Edges are directed. Duplicate pairs may appear in the raw list — the
/// graph store collapses them to one structural edge while keeping the raw
/// count for statistics. Self-references (`dependent == dependency`) are
/// legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEdge {
    /// The section making the reference.
    pub dependent: CitationPath,
    /// The section being referenced.
    pub dependency: CitationPath,
}

impl ReferenceEdge {
    /// Creates an edge from `dependent` to `dependency`.
    pub fn new(
        dependent: impl Into<CitationPath>,
        dependency: impl Into<CitationPath>,
    ) -> Self {
        Self {
            dependent: dependent.into(),
            dependency: dependency.into(),
        }
    }
}

/// Extraction output: every known section plus the raw reference edges.
///
/// `nodes` lists all sections discovered in the markup, including isolated
/// sections with no references in either direction. No ordering guarantee
/// is made on either list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedRefs {
    /// All known citation paths.
    pub nodes: Vec<CitationPath>,
    /// Raw reference edges, duplicates included.
    pub edges: Vec<ReferenceEdge>,
}
