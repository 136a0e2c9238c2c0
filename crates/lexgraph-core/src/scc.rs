//! Strongly-connected-component decomposition.
//!
//! Tarjan's algorithm, implemented iteratively with an explicit DFS stack.
//! Statutory dependency chains can run thousands of sections deep, so the
//! traversal must not recurse — the work stack replaces the call stack
//! frame-for-frame.

use tracing::debug;

use crate::graph::RefGraph;

/// Sentinel for a node not yet assigned a discovery index.
const UNVISITED: usize = usize::MAX;

/// Decomposes the graph into strongly connected components.
///
/// Returns the components as lists of node indices. Every node appears in
/// exactly one component; singletons are included. A self-loop does not
/// force a node into a multi-member component.
///
/// Components are emitted in Tarjan completion order, which happens to be
/// a reverse topological order of the condensation — callers must not rely
/// on that: the sequencer re-derives topological order explicitly, and the
/// emission order is only promised to be deterministic for identical
/// input.
///
/// O(V+E) time and memory.
pub fn decompose(graph: &RefGraph) -> Vec<Vec<usize>> {
    let n = graph.num_nodes();

    // Adjacency is materialized up front so the DFS can resume a node's
    // neighbor scan from a plain cursor after returning from a child.
    let adjacency: Vec<Vec<usize>> = (0..n)
        .map(|v| graph.dependency_indices(v).collect())
        .collect();

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut next_index = 0usize;

    // Tarjan component stack.
    let mut stack: Vec<usize> = Vec::new();
    // Explicit DFS stack: (node, neighbor cursor).
    let mut work: Vec<(usize, usize)> = Vec::new();

    let mut sccs: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }
        work.push((start, 0));

        while let Some(&(v, cursor)) = work.last() {
            if cursor == 0 {
                // First visit of v.
                index[v] = next_index;
                lowlink[v] = next_index;
                next_index += 1;
                stack.push(v);
                on_stack[v] = true;
            }

            if cursor < adjacency[v].len() {
                work.last_mut().expect("work stack is non-empty").1 += 1;
                let w = adjacency[v][cursor];
                if index[w] == UNVISITED {
                    work.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                // Else: w belongs to an already-emitted component; the
                // edge leaves the current DFS tree and is ignored.
            } else {
                // All neighbors of v explored.
                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
                if lowlink[v] == index[v] {
                    // v is the root of a component: pop it off the stack.
                    let mut component = Vec::new();
                    loop {
                        let w = stack
                            .pop()
                            .expect("component root is still on the stack");
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    sccs.push(component);
                }
            }
        }
    }

    debug!(
        num_nodes = n,
        scc_count = sccs.len(),
        "Decomposed graph into SCCs"
    );
    sccs
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use lexgraph_schemas::{CitationPath, ReferenceEdge};

    use super::*;
    use crate::graph::GraphOptions;

    fn build(nodes: &[&str], edges: &[(&str, &str)]) -> RefGraph {
        let nodes: Vec<CitationPath> =
            nodes.iter().map(|&s| CitationPath::new(s)).collect();
        let edges: Vec<ReferenceEdge> = edges
            .iter()
            .map(|&(a, b)| ReferenceEdge::new(a, b))
            .collect();
        RefGraph::build(&nodes, &edges, GraphOptions::default()).unwrap()
    }

    /// Maps each component to the set of citation strings it contains.
    fn scc_sets(graph: &RefGraph, sccs: &[Vec<usize>]) -> Vec<HashSet<String>> {
        sccs.iter()
            .map(|members| {
                members
                    .iter()
                    .map(|&i| graph.citation(i).as_str().to_owned())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn empty_graph_has_no_components() {
        let g = build(&[], &[]);
        assert!(decompose(&g).is_empty());
    }

    #[test]
    fn chain_yields_singletons() {
        let g = build(&[], &[("A", "B"), ("B", "C")]);
        let sccs = decompose(&g);
        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn two_cycle_merges() {
        let g = build(&[], &[("A", "B"), ("B", "A"), ("A", "C")]);
        let sccs = decompose(&g);
        let sets = scc_sets(&g, &sccs);
        assert_eq!(sccs.len(), 2);
        assert!(sets.contains(&HashSet::from(["A".into(), "B".into()])));
        assert!(sets.contains(&HashSet::from(["C".into()])));
    }

    #[test]
    fn self_loop_stays_singleton() {
        let g = build(&[], &[("A", "A"), ("A", "B")]);
        let sccs = decompose(&g);
        assert_eq!(sccs.len(), 2);
        assert!(sccs.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn three_cycle_merges() {
        let g = build(&[], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let sccs = decompose(&g);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), 3);
    }

    #[test]
    fn partition_is_exact() {
        let g = build(
            &["I"],
            &[
                ("A", "B"),
                ("B", "A"),
                ("B", "C"),
                ("C", "D"),
                ("D", "C"),
                ("E", "A"),
            ],
        );
        let sccs = decompose(&g);

        let mut seen: HashSet<usize> = HashSet::new();
        for component in &sccs {
            for &node in component {
                assert!(seen.insert(node), "node {node} in two components");
            }
        }
        assert_eq!(seen.len(), g.num_nodes());
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        // A recursive implementation would blow the call stack here.
        let names: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let edges: Vec<(&str, &str)> = names
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        let g = build(&[], &edges);
        let sccs = decompose(&g);
        assert_eq!(sccs.len(), 50_000);
    }

    #[test]
    fn emission_order_is_deterministic() {
        let edges = [("A", "B"), ("B", "C"), ("C", "A"), ("D", "A")];
        let g1 = build(&[], &edges);
        let g2 = build(&[], &edges);
        assert_eq!(decompose(&g1), decompose(&g2));
    }
}
