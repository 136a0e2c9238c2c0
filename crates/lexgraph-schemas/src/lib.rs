//! Schema definitions for the lexgraph pipeline.
//!
//! This crate contains the data structures exchanged between the pipeline
//! phases: the citation-path node keys and raw reference edges produced by
//! extraction, and the summary/sequence/hub records produced by analysis.
//! These types are serialized to JSON for export.
//!
//! Keeping the schemas in one crate guarantees consistent serialization
//! contracts across extraction, analysis, and the CLI.

mod citation;
mod refs;
mod report;

#[doc(inline)]
pub use citation::*;
#[doc(inline)]
pub use refs::*;
#[doc(inline)]
pub use report::*;
