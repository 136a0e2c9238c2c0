//! Analysis output records: summary, encoding sequence, hubs, components.

use serde::{Deserialize, Serialize};

use crate::CitationPath;

/// Top-level structural summary of a reference graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of sections (nodes).
    pub num_nodes: usize,
    /// Number of distinct cross-reference edges.
    pub num_edges: usize,
    /// Edge density: `edges / (nodes * (nodes - 1))`, 0 when fewer than
    /// two nodes.
    pub density: f64,
    /// Average number of dependencies per section.
    pub avg_in_degree: f64,
    /// Number of strongly connected components.
    pub num_scc: usize,
}

/// One entry of the resolved encoding sequence.
///
/// Produced once per analysis run; read-only output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    /// 1-based, contiguous position in the overall sequence.
    pub order: usize,
    /// The section this entry describes.
    pub citation_path: CitationPath,
    /// Number of distinct sections that reference this one.
    pub dependents: usize,
    /// Number of distinct sections this one references.
    pub dependencies: usize,
    /// Size of the strongly connected component owning this section.
    pub scc_size: usize,
}

/// One hub-ranking entry: a section and its dependent count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntry {
    /// The hub section.
    pub citation_path: CitationPath,
    /// Number of distinct sections referencing it.
    pub dependents: usize,
}

/// Size statistics over the SCC partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStats {
    /// Total number of SCCs (including singletons).
    pub num_sccs: usize,
    /// Number of SCCs with more than one member (real cycles).
    pub num_cycles: usize,
    /// Size of the largest SCC, 0 for an empty graph.
    pub largest: usize,
}
