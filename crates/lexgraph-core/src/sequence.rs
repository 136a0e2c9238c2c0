//! Condensation and topological sequencing.
//!
//! Collapses the SCC partition into its condensation DAG, orders that DAG
//! with Kahn's algorithm, and expands each component into a contiguous
//! block of sequence entries. The topological order is derived here from
//! scratch rather than trusting the decomposition's emission order — the
//! SCC engine's ordering is an implementation detail, not a contract.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use lexgraph_schemas::SequenceEntry;
use tracing::debug;

use crate::error::{GraphError, GraphErrorKind};
use crate::graph::RefGraph;

/// SCC-level view of the graph: the deduplicated condensation adjacency.
#[derive(Debug)]
pub(crate) struct Condensation {
    /// Condensation edges, dependency SCC → dependent SCC.
    pub successors: Vec<Vec<usize>>,
    /// Number of distinct dependency SCCs feeding each SCC.
    pub indegree: Vec<usize>,
}

/// Builds the condensation of `graph` under the given SCC partition.
///
/// Intra-SCC edges (including self-loops, which never cross a component
/// boundary) are skipped; cross-SCC multi-edges collapse to one. Edges are
/// oriented dependency → dependent so that an indegree-zero component has
/// no unprocessed dependencies.
///
/// # Errors
///
/// Returns an internal-consistency error if the partition does not cover
/// every node exactly once — impossible for a partition produced by
/// [`crate::scc::decompose`], so any hit indicates an implementation bug.
pub(crate) fn condense(
    graph: &RefGraph,
    sccs: &[Vec<usize>],
) -> Result<Condensation, GraphError> {
    const UNASSIGNED: usize = usize::MAX;

    let n = graph.num_nodes();
    let mut owner = vec![UNASSIGNED; n];
    for (scc_id, members) in sccs.iter().enumerate() {
        for &node in members {
            if owner[node] != UNASSIGNED {
                return Err(internal(format!(
                    "node {node} appears in two components"
                )));
            }
            owner[node] = scc_id;
        }
    }
    if let Some(node) = owner.iter().position(|&o| o == UNASSIGNED) {
        return Err(internal(format!(
            "node {node} missing from the component partition"
        )));
    }

    // BTreeSet deduplicates cross-component multi-edges and keeps the
    // adjacency construction order-independent of edge insertion order.
    let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
    for dependent in 0..n {
        for dependency in graph.dependency_indices(dependent) {
            let from = owner[dependency];
            let to = owner[dependent];
            if from != to {
                edges.insert((from, to));
            }
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); sccs.len()];
    let mut indegree = vec![0usize; sccs.len()];
    for &(from, to) in &edges {
        successors[from].push(to);
        indegree[to] += 1;
    }

    Ok(Condensation {
        successors,
        indegree,
    })
}

/// Topologically orders the condensation with Kahn's algorithm.
///
/// Tie-break: among components simultaneously available (indegree zero),
/// the lowest SCC id goes first, via a min-heap. SCC ids are assigned in
/// decomposition emission order, which is deterministic for identical
/// input, so the full ordering is reproducible.
///
/// # Errors
///
/// The condensation of an SCC partition is acyclic by construction, so
/// the queue draining with components left unvisited can only mean an
/// implementation bug; that residue is surfaced as a fatal
/// internal-consistency error.
pub(crate) fn topo_order(
    condensation: &Condensation,
) -> Result<Vec<usize>, GraphError> {
    let num_sccs = condensation.successors.len();
    let mut indegree = condensation.indegree.clone();

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(id, _)| Reverse(id))
        .collect();

    let mut order = Vec::with_capacity(num_sccs);
    while let Some(Reverse(scc_id)) = ready.pop() {
        order.push(scc_id);
        for &succ in &condensation.successors[scc_id] {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() != num_sccs {
        return Err(internal(format!(
            "topological pass left {} of {num_sccs} components unvisited",
            num_sccs - order.len()
        )));
    }
    Ok(order)
}

/// Produces the total encoding sequence for the graph.
///
/// Components are visited in condensation-topological order (dependencies
/// first). Singleton components contribute their sole node; multi-node
/// components are appended as one contiguous block, internally ordered
/// hub-first — descending whole-graph dependent count, ties by ascending
/// citation path.
///
/// Every node appears exactly once; positions are 1-based and contiguous.
///
/// # Errors
///
/// Only internal-consistency failures (see [`GraphError::is_internal`]);
/// there is no valid input on which sequencing legitimately fails.
pub fn sequence(
    graph: &RefGraph,
    sccs: &[Vec<usize>],
) -> Result<Vec<SequenceEntry>, GraphError> {
    let condensation = condense(graph, sccs)?;
    let order = topo_order(&condensation)?;

    let mut entries: Vec<SequenceEntry> =
        Vec::with_capacity(graph.num_nodes());
    for scc_id in order {
        let mut members = sccs[scc_id].clone();
        if members.len() > 1 {
            members.sort_unstable_by(|&a, &b| {
                graph
                    .dependent_count(b)
                    .cmp(&graph.dependent_count(a))
                    .then_with(|| graph.citation(a).cmp(graph.citation(b)))
            });
        }
        for node in members {
            entries.push(SequenceEntry {
                order: entries.len() + 1,
                citation_path: graph.citation(node).clone(),
                dependents: graph.dependent_count(node),
                dependencies: graph.dependency_count(node),
                scc_size: sccs[scc_id].len(),
            });
        }
    }

    debug!(entries = entries.len(), "Computed encoding sequence");
    Ok(entries)
}

fn internal(detail: String) -> GraphError {
    GraphError::new(GraphErrorKind::InternalConsistency(detail))
}

#[cfg(test)]
mod tests {
    use lexgraph_schemas::{CitationPath, ReferenceEdge};

    use super::*;
    use crate::graph::GraphOptions;
    use crate::scc::decompose;

    fn build(nodes: &[&str], edges: &[(&str, &str)]) -> RefGraph {
        let nodes: Vec<CitationPath> =
            nodes.iter().map(|&s| CitationPath::new(s)).collect();
        let edges: Vec<ReferenceEdge> = edges
            .iter()
            .map(|&(a, b)| ReferenceEdge::new(a, b))
            .collect();
        RefGraph::build(&nodes, &edges, GraphOptions::default()).unwrap()
    }

    fn run(graph: &RefGraph) -> Vec<SequenceEntry> {
        let sccs = decompose(graph);
        sequence(graph, &sccs).unwrap()
    }

    fn paths(entries: &[SequenceEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|e| e.citation_path.as_str())
            .collect()
    }

    #[test]
    fn chain_orders_dependencies_first() {
        // A depends on B, B depends on C.
        let g = build(&[], &[("A", "B"), ("B", "C")]);
        let entries = run(&g);
        assert_eq!(paths(&entries), vec!["C", "B", "A"]);
        assert_eq!(
            entries.iter().map(|e| e.order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn empty_graph_yields_empty_sequence() {
        let g = build(&[], &[]);
        assert!(run(&g).is_empty());
    }

    #[test]
    fn diamond_respects_all_edges() {
        let g = build(
            &[],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        let entries = run(&g);
        let pos = |name: &str| {
            entries
                .iter()
                .position(|e| e.citation_path.as_str() == name)
                .unwrap()
        };
        assert!(pos("D") < pos("B"));
        assert!(pos("D") < pos("C"));
        assert!(pos("B") < pos("A"));
        assert!(pos("C") < pos("A"));
    }

    #[test]
    fn cycle_block_is_contiguous_and_after_shared_dependency() {
        // A and B form a 2-cycle; A also depends on C.
        let g = build(&[], &[("A", "B"), ("B", "A"), ("A", "C")]);
        let entries = run(&g);
        let names = paths(&entries);

        // C carries no dependencies, so it precedes the cycle block.
        assert_eq!(names[0], "C");
        // A and B tie on dependent count (1 each); alphabetical break.
        assert_eq!(&names[1..], &["A", "B"]);
        assert_eq!(entries[1].scc_size, 2);
        assert_eq!(entries[2].scc_size, 2);
    }

    #[test]
    fn cycle_members_ordered_by_dependent_count() {
        // Cycle {A, B}; C and D also depend on B, making B the hub.
        let g = build(
            &[],
            &[("A", "B"), ("B", "A"), ("C", "B"), ("D", "B")],
        );
        let entries = run(&g);
        let names = paths(&entries);
        let a = names.iter().position(|&n| n == "A").unwrap();
        let b = names.iter().position(|&n| n == "B").unwrap();
        // B has 3 dependents, A has 1: hub-first puts B before A.
        assert!(b < a);
        // The block stays contiguous.
        assert_eq!(a.abs_diff(b), 1);
    }

    #[test]
    fn self_loop_appears_once() {
        let g = build(&[], &[("A", "A")]);
        let entries = run(&g);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].dependencies, 1);
        assert_eq!(entries[0].scc_size, 1);
    }

    #[test]
    fn isolated_nodes_are_included() {
        let g = build(&["X", "Y"], &[("A", "B")]);
        let entries = run(&g);
        assert_eq!(entries.len(), 4);
        let names = paths(&entries);
        assert!(names.contains(&"X"));
        assert!(names.contains(&"Y"));
    }

    #[test]
    fn entries_carry_degree_counts() {
        let g = build(&[], &[("A", "B"), ("A", "C"), ("D", "B")]);
        let entries = run(&g);
        let entry = |name: &str| {
            entries
                .iter()
                .find(|e| e.citation_path.as_str() == name)
                .unwrap()
        };
        assert_eq!(entry("A").dependencies, 2);
        assert_eq!(entry("A").dependents, 0);
        assert_eq!(entry("B").dependents, 2);
        assert_eq!(entry("B").dependencies, 0);
    }

    #[test]
    fn sequencing_is_deterministic() {
        let edges = [
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("D", "A"),
            ("E", "D"),
            ("F", "F"),
        ];
        let g1 = build(&["Z"], &edges);
        let g2 = build(&["Z"], &edges);
        assert_eq!(run(&g1), run(&g2));
    }

    #[test]
    fn condense_rejects_partial_partition() {
        let g = build(&[], &[("A", "B")]);
        // Drop node 1 from the partition.
        let bad_sccs = vec![vec![0]];
        let err = condense(&g, &bad_sccs).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn condense_rejects_overlapping_partition() {
        let g = build(&[], &[("A", "B")]);
        let bad_sccs = vec![vec![0, 1], vec![1]];
        let err = condense(&g, &bad_sccs).unwrap_err();
        assert!(err.is_internal());
    }
}
