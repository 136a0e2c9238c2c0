//! Error types for the lexgraph-core crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for reference-graph construction and sequencing.
///
/// Captures the two failure classes of the engine: identifiers rejected by
/// strict-mode validation at construction time, and internal-consistency
/// violations that can only arise from an implementation bug (the
/// condensation of an SCC partition is acyclic by construction, so the
/// topological pass can never legitimately fail on valid input).
#[derive(Debug)]
pub struct GraphError {
    kind: GraphErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum GraphErrorKind {
    /// An identifier failed the citation-path grammar under strict mode.
    InvalidIdentifier(String),
    /// Decomposition or sequencing produced a contradictory result.
    InternalConsistency(String),
}

impl GraphError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: GraphErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if this error is a strict-mode identifier rejection.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self.kind, GraphErrorKind::InvalidIdentifier(_))
    }

    /// Returns true if this error is an internal-consistency failure.
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, GraphErrorKind::InternalConsistency(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for GraphErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphErrorKind::InvalidIdentifier(identifier) => {
                write!(f, "invalid citation identifier: {identifier:?}")
            }
            GraphErrorKind::InternalConsistency(detail) => {
                write!(f, "internal consistency error: {detail}")
            }
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier() {
        let err = GraphError::new(GraphErrorKind::InvalidIdentifier(
            "bad id".to_string(),
        ));

        assert!(err.is_invalid_identifier());
        assert!(!err.is_internal());
        assert!(err.to_string().contains("invalid citation identifier"));
    }

    #[test]
    fn test_internal_consistency() {
        let err = GraphError::new(GraphErrorKind::InternalConsistency(
            "residual unvisited components".to_string(),
        ));

        assert!(err.is_internal());
        assert!(!err.is_invalid_identifier());
        assert!(err.to_string().contains("internal consistency error"));
    }

    #[test]
    fn test_backtrace_captured() {
        let err = GraphError::new(GraphErrorKind::InternalConsistency(
            "test".to_string(),
        ));
        // Just verify we can call backtrace() - the actual content depends
        // on RUST_BACKTRACE environment variable.
        let _ = err.backtrace();
    }

    #[test]
    fn test_debug_impl() {
        let err = GraphError::new(GraphErrorKind::InvalidIdentifier(
            "x".to_string(),
        ));
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("GraphError"));
    }
}
