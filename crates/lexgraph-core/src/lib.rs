//! Reference-graph engine for statutory cross-reference analysis.
//!
//! Models a corpus of statute sections as a directed dependency graph and
//! derives a total "encoding order" over it: every section's dependencies
//! precede it, reference cycles are resolved deterministically, and
//! high-impact hub sections are surfaced.
//!
//! ## Pipeline
//!
//! 1. [`RefGraph::build`] — construct the immutable graph store from raw
//!    edges (and optional explicit node registrations)
//! 2. [`scc::decompose`] — partition into strongly connected components
//!    (iterative Tarjan)
//! 3. [`sequence::sequence`] — condense, topologically order with Kahn's
//!    algorithm, and expand into the encoding sequence
//! 4. [`metrics`] — density, degree averages, hub ranking, dependency
//!    depth, component statistics
//!
//! Each analysis run owns one `RefGraph`; all reads after construction
//! are pure, so independent metrics may be computed concurrently against
//! the same instance.
//!
//! ## Usage
//!
//! ```
//! use lexgraph_core::{GraphOptions, RefGraph, metrics, scc, sequence};
//! use lexgraph_schemas::ReferenceEdge;
//!
//! let edges = vec![
//!     ReferenceEdge::new("us/statute/26/32", "us/statute/26/151"),
//!     ReferenceEdge::new("us/statute/26/151", "us/statute/26/152"),
//! ];
//! let graph = RefGraph::build(&[], &edges, GraphOptions::default())?;
//! let sccs = scc::decompose(&graph);
//! let order = sequence::sequence(&graph, &sccs)?;
//! assert_eq!(order[0].citation_path.as_str(), "us/statute/26/152");
//! let summary = metrics::summary(&graph, &sccs);
//! assert_eq!(summary.num_scc, 3);
//! # Ok::<(), lexgraph_core::GraphError>(())
//! ```

mod error;
mod graph;
pub mod metrics;
pub mod scc;
pub mod sequence;

#[doc(inline)]
pub use crate::error::GraphError;
#[doc(inline)]
pub use crate::graph::{GraphOptions, RefGraph};
