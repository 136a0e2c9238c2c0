//! Error types for the lexgraph-extract crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for statute extraction operations.
///
/// Captures failures that can occur while reading and parsing USLM XML
/// sources. Unparseable identifiers and hrefs inside an otherwise valid
/// document are not errors; they are skipped and logged.
#[derive(Debug)]
pub struct ExtractError {
    kind: ExtractErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods instead.
#[derive(Debug)]
pub(crate) enum ExtractErrorKind {
    /// I/O error while reading an XML source.
    Io(std::io::Error),
    /// The XML document failed to parse.
    Xml(roxmltree::Error),
}

impl ExtractError {
    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::Io(_))
    }

    /// Returns true if this error is due to XML parse failure.
    pub fn is_xml(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::Xml(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractErrorKind::Io(err) => write!(f, "I/O error: {err}"),
            ExtractErrorKind::Xml(err) => {
                write!(f, "failed to parse XML: {err}")
            }
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExtractErrorKind::Io(err) => Some(err),
            ExtractErrorKind::Xml(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        Self {
            kind: ExtractErrorKind::Io(err),
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<roxmltree::Error> for ExtractError {
    fn from(err: roxmltree::Error) -> Self {
        Self {
            kind: ExtractErrorKind::Xml(err),
            backtrace: Backtrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_io_from() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ExtractError::from(io_err);

        assert!(err.is_io());
        assert!(!err.is_xml());

        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_xml_from() {
        let xml_err = roxmltree::Document::parse("<unclosed").unwrap_err();
        let err = ExtractError::from(xml_err);

        assert!(err.is_xml());
        assert!(!err.is_io());

        assert!(err.to_string().contains("failed to parse XML"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_backtrace_captured() {
        let err = ExtractError::from(std::io::Error::other("test"));
        // Content depends on the RUST_BACKTRACE environment variable.
        let _ = err.backtrace();
    }
}
