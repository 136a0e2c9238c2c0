//! Derived structural metrics.
//!
//! Stateless functions over a constructed [`RefGraph`] (plus its SCC
//! partition where component-level information is needed). All metrics
//! degrade gracefully on degenerate inputs — an empty or edgeless graph
//! is never an error.

use itertools::Itertools;
use lexgraph_schemas::{CitationPath, ComponentStats, GraphSummary, HubEntry};

use crate::error::GraphError;
use crate::graph::RefGraph;
use crate::sequence::{condense, topo_order};

/// Average number of dependencies per section: distinct edges / nodes.
///
/// 0.0 for an empty graph.
pub fn avg_in_degree(graph: &RefGraph) -> f64 {
    let n = graph.num_nodes();
    if n == 0 {
        return 0.0;
    }
    graph.num_edges() as f64 / n as f64
}

/// Longest dependency chain, measured in edges on the condensation DAG.
///
/// Computed by dynamic programming over the condensation's topological
/// order: `depth(scc) = 1 + max(depth(dependency sccs))`, roots at 0.
/// Measuring on the condensation sidesteps ill-defined longest paths
/// inside a cycle. 0 for an edgeless or empty graph.
///
/// # Errors
///
/// Internal-consistency failures only, as for
/// [`sequence`](crate::sequence::sequence).
pub fn max_depth(
    graph: &RefGraph,
    sccs: &[Vec<usize>],
) -> Result<usize, GraphError> {
    if graph.num_nodes() == 0 {
        return Ok(0);
    }
    let condensation = condense(graph, sccs)?;
    let order = topo_order(&condensation)?;

    // Edges run dependency → dependent, so walking the topological order
    // relaxes every component's depth before its dependents read it.
    let mut depth = vec![0usize; sccs.len()];
    for &scc_id in &order {
        for &succ in &condensation.successors[scc_id] {
            depth[succ] = depth[succ].max(depth[scc_id] + 1);
        }
    }
    Ok(depth.into_iter().max().unwrap_or(0))
}

/// Top-`top_k` sections by dependent count, descending.
///
/// Ties break by ascending citation path. `top_k` is clamped to the node
/// count.
pub fn hubs(graph: &RefGraph, top_k: usize) -> Vec<HubEntry> {
    graph
        .node_indices()
        .map(|i| (graph.dependent_count(i), graph.citation(i)))
        .sorted_unstable_by(|(count_a, path_a), (count_b, path_b)| {
            count_b.cmp(count_a).then_with(|| path_a.cmp(path_b))
        })
        .take(top_k.min(graph.num_nodes()))
        .map(|(dependents, path)| HubEntry {
            citation_path: path.clone(),
            dependents,
        })
        .collect()
}

/// Sections with zero dependencies — encodable immediately. Sorted by
/// citation path.
pub fn ready_nodes(graph: &RefGraph) -> Vec<CitationPath> {
    graph
        .node_indices()
        .filter(|&i| graph.dependency_count(i) == 0)
        .map(|i| graph.citation(i).clone())
        .sorted_unstable()
        .collect()
}

/// Size statistics over the SCC partition.
pub fn component_stats(sccs: &[Vec<usize>]) -> ComponentStats {
    ComponentStats {
        num_sccs: sccs.len(),
        num_cycles: sccs.iter().filter(|c| c.len() > 1).count(),
        largest: sccs.iter().map(Vec::len).max().unwrap_or(0),
    }
}

/// Assembles the top-level graph summary.
pub fn summary(graph: &RefGraph, sccs: &[Vec<usize>]) -> GraphSummary {
    GraphSummary {
        num_nodes: graph.num_nodes(),
        num_edges: graph.num_edges(),
        density: graph.density(),
        avg_in_degree: avg_in_degree(graph),
        num_scc: sccs.len(),
    }
}

#[cfg(test)]
mod tests {
    use lexgraph_schemas::ReferenceEdge;

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

    #[test]
    fn avg_in_degree_empty_graph() {
        let g = build(&[], &[]);
        assert_eq!(avg_in_degree(&g), 0.0);
    }

    #[test]
    fn avg_in_degree_counts_distinct_edges() {
        // 3 distinct edges over 4 nodes, duplicate ignored.
        let g = build(
            &["D"],
            &[("A", "B"), ("A", "B"), ("A", "C"), ("B", "C")],
        );
        assert!((avg_in_degree(&g) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn max_depth_edgeless_is_zero() {
        let g = build(&["A", "B"], &[]);
        let sccs = decompose(&g);
        assert_eq!(max_depth(&g, &sccs).unwrap(), 0);
    }

    #[test]
    fn max_depth_of_chain() {
        // A -> B -> C -> D: three edges deep.
        let g = build(&[], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let sccs = decompose(&g);
        assert_eq!(max_depth(&g, &sccs).unwrap(), 3);
    }

    #[test]
    fn max_depth_collapses_cycles() {
        // 2-cycle {A, B} above C: cycle block counts as one step.
        let g = build(&[], &[("A", "B"), ("B", "A"), ("B", "C")]);
        let sccs = decompose(&g);
        assert_eq!(max_depth(&g, &sccs).unwrap(), 1);
    }

    #[test]
    fn hubs_rank_by_dependents_then_path() {
        let g = build(
            &[],
            &[("A", "D"), ("B", "D"), ("C", "D"), ("E", "D"), ("A", "B")],
        );
        let top = hubs(&g, 2);
        assert_eq!(top[0].citation_path.as_str(), "D");
        assert_eq!(top[0].dependents, 4);
        assert_eq!(top[1].citation_path.as_str(), "B");
        assert_eq!(top[1].dependents, 1);
    }

    #[test]
    fn hubs_alphabetical_on_tie() {
        // B and C each have exactly one dependent.
        let g = build(&[], &[("A", "B"), ("B", "C")]);
        let top = hubs(&g, 3);
        assert_eq!(top[0].citation_path.as_str(), "B");
        assert_eq!(top[1].citation_path.as_str(), "C");
        assert_eq!(top[2].citation_path.as_str(), "A");
        assert_eq!(top[2].dependents, 0);
    }

    #[test]
    fn hubs_clamps_top_k() {
        let g = build(&["A", "B"], &[]);
        assert_eq!(hubs(&g, 10).len(), 2);
        assert!(hubs(&build(&[], &[]), 5).is_empty());
    }

    #[test]
    fn ready_nodes_have_zero_dependencies() {
        let g = build(&["Z"], &[("A", "B"), ("B", "C")]);
        let ready = ready_nodes(&g);
        let names: Vec<&str> = ready.iter().map(CitationPath::as_str).collect();
        assert_eq!(names, vec!["C", "Z"]);
    }

    #[test]
    fn self_loop_is_not_ready() {
        let g = build(&[], &[("A", "A")]);
        assert!(ready_nodes(&g).is_empty());
    }

    #[test]
    fn edgeless_graph_all_ready() {
        let g = build(&["B", "A"], &[]);
        let ready = ready_nodes(&g);
        let names: Vec<&str> = ready.iter().map(CitationPath::as_str).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn component_stats_counts_cycles() {
        let g = build(
            &["I"],
            &[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C"), ("C", "E")],
        );
        let sccs = decompose(&g);
        let stats = component_stats(&sccs);
        assert_eq!(stats.num_sccs, 4); // {A,B}, {C,D}, {E}, {I}
        assert_eq!(stats.num_cycles, 2);
        assert_eq!(stats.largest, 2);
    }

    #[test]
    fn summary_of_empty_graph() {
        let g = build(&[], &[]);
        let sccs = decompose(&g);
        let s = summary(&g, &sccs);
        assert_eq!(s.num_nodes, 0);
        assert_eq!(s.num_edges, 0);
        assert_eq!(s.density, 0.0);
        assert_eq!(s.avg_in_degree, 0.0);
        assert_eq!(s.num_scc, 0);
    }
}
