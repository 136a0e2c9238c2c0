//! The reference-graph store.
//!
//! A [`RefGraph`] holds the section nodes and deduplicated cross-reference
//! edges of one analysis snapshot, with adjacency queryable in both
//! directions. Built once from a batch of raw edges; immutable afterward —
//! every analysis run owns one instance with a clear creation point and no
//! mutation API.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexSet;
use lexgraph_schemas::{CitationPath, ReferenceEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use regex::Regex;
use tracing::debug;

use crate::error::{GraphError, GraphErrorKind};

/// Grammar for citation-path identifiers under strict validation:
/// slash-separated segments of `[A-Za-z0-9._-]`.
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+(?:/[A-Za-z0-9._-]+)*$")
        .expect("identifier grammar regex is valid")
});

/// Construction options for [`RefGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// When true, every identifier (registered node or edge endpoint) must
    /// match the citation-path grammar; the first offender aborts the
    /// build. When false (default), any string is accepted as a node key
    /// and unseen edge endpoints auto-register — the edge list is the
    /// primary source of truth in permissive real-world data.
    pub strict: bool,
}

/// Directed graph of statutory cross-references.
///
/// Edges point dependent → dependency: an edge A → B means "A references
/// (depends on) B", so the Outgoing direction from a node yields its
/// dependencies and the Incoming direction its dependents. Multi-edges
/// between the same ordered pair collapse to one structural edge; the raw
/// reference count is kept separately. Self-loops are stored as ordinary
/// edges.
#[derive(Debug)]
pub struct RefGraph {
    /// Citation paths, providing the node-id ↔ index mapping. Insertion
    /// order is the registration order, which makes derived component ids
    /// deterministic for identical input.
    names: IndexSet<CitationPath>,
    /// Adjacency store. Node weights are the `names` indices.
    graph: DiGraph<usize, ()>,
    /// Count of distinct ordered edge pairs.
    num_edges: usize,
    /// Count of raw references before deduplication.
    raw_references: usize,
}

impl RefGraph {
    /// Builds a graph from explicitly known nodes plus raw edges.
    ///
    /// Nodes register in list order, then unseen edge endpoints register in
    /// first-appearance order. Duplicate edges collapse.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`GraphError`] (`is_invalid_identifier`)
    /// for the first identifier failing the citation-path grammar; the
    /// build aborts before any derived computation.
    pub fn build(
        nodes: &[CitationPath],
        edges: &[ReferenceEdge],
        options: GraphOptions,
    ) -> Result<Self, GraphError> {
        if options.strict {
            validate_identifiers(nodes, edges)?;
        }

        let mut names: IndexSet<CitationPath> = IndexSet::new();
        for node in nodes {
            names.insert(node.clone());
        }
        for edge in edges {
            names.insert(edge.dependent.clone());
            names.insert(edge.dependency.clone());
        }

        let mut graph = DiGraph::<usize, ()>::with_capacity(names.len(), 0);
        for i in 0..names.len() {
            graph.add_node(i);
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for edge in edges {
            let from = names
                .get_index_of(&edge.dependent)
                .expect("endpoint was registered above");
            let to = names
                .get_index_of(&edge.dependency)
                .expect("endpoint was registered above");
            if seen.insert((from, to)) {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }

        let built = Self {
            num_edges: seen.len(),
            raw_references: edges.len(),
            names,
            graph,
        };
        debug!(
            num_nodes = built.num_nodes(),
            num_edges = built.num_edges(),
            raw_references = built.raw_references(),
            "Built reference graph"
        );
        Ok(built)
    }

    /// Number of sections in the graph.
    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct cross-reference edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Number of raw references before deduplication.
    pub fn raw_references(&self) -> usize {
        self.raw_references
    }

    /// Edge density: `edges / (nodes * (nodes - 1))`.
    ///
    /// Defined as 0 when fewer than two nodes exist (no ordered pair is
    /// possible).
    pub fn density(&self) -> f64 {
        let n = self.num_nodes();
        if n <= 1 {
            return 0.0;
        }
        self.num_edges as f64 / (n * (n - 1)) as f64
    }

    /// Returns true if the citation path is a node of this graph.
    pub fn contains(&self, path: &CitationPath) -> bool {
        self.names.contains(path)
    }

    /// Returns the node index for a citation path, if registered.
    pub fn index_of(&self, path: &CitationPath) -> Option<usize> {
        self.names.get_index_of(path)
    }

    /// Returns the citation path at the given node index.
    pub fn citation(&self, index: usize) -> &CitationPath {
        self.names.get_index(index).expect("valid node index")
    }

    /// Iterates all node indices.
    pub fn node_indices(&self) -> impl Iterator<Item = usize> {
        0..self.num_nodes()
    }

    /// Sections this one references, sorted by citation path.
    ///
    /// Returns an empty list for unknown paths.
    pub fn dependencies_of(&self, path: &CitationPath) -> Vec<&CitationPath> {
        self.sorted_neighbors(path, Direction::Outgoing)
    }

    /// Sections referencing this one, sorted by citation path.
    ///
    /// Returns an empty list for unknown paths.
    pub fn dependents_of(&self, path: &CitationPath) -> Vec<&CitationPath> {
        self.sorted_neighbors(path, Direction::Incoming)
    }

    /// Number of distinct dependencies of the node at `index`.
    pub fn dependency_count(&self, index: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
            .count()
    }

    /// Number of distinct dependents of the node at `index`.
    pub fn dependent_count(&self, index: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
            .count()
    }

    /// Dependency node indices of the node at `index` (unsorted).
    pub fn dependency_indices(
        &self,
        index: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
            .map(NodeIndex::index)
    }

    /// Dependent node indices of the node at `index` (unsorted).
    pub fn dependent_indices(
        &self,
        index: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
            .map(NodeIndex::index)
    }

    fn sorted_neighbors(
        &self,
        path: &CitationPath,
        direction: Direction,
    ) -> Vec<&CitationPath> {
        let Some(index) = self.index_of(path) else {
            return Vec::new();
        };
        let mut neighbors: Vec<&CitationPath> = self
            .graph
            .neighbors_directed(NodeIndex::new(index), direction)
            .map(|n| self.citation(n.index()))
            .collect();
        neighbors.sort_unstable();
        neighbors
    }
}

/// Validates every identifier against the citation-path grammar.
fn validate_identifiers(
    nodes: &[CitationPath],
    edges: &[ReferenceEdge],
) -> Result<(), GraphError> {
    let endpoints = edges
        .iter()
        .flat_map(|e| [&e.dependent, &e.dependency]);
    for path in nodes.iter().chain(endpoints) {
        if !IDENTIFIER_RE.is_match(path.as_str()) {
            return Err(GraphError::new(GraphErrorKind::InvalidIdentifier(
                path.as_str().to_owned(),
            )));
        }
    }
    Ok(())
}
