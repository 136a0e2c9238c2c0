//! Citation-path node keys.

use serde::{Deserialize, Serialize};

/// Canonical citation path identifying one statute section.
///
/// Example: `"us/statute/26/32"` for 26 U.S.C. § 32. The path is treated as
/// an opaque key — only equality, hashing, and lexicographic ordering are
/// interpreted; no internal structure beyond the final segment (used as a
/// display shorthand) is read.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CitationPath(String);

impl CitationPath {
    /// Creates a citation path from a raw string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the section shorthand: the final path segment.
    ///
    /// `"us/statute/26/32"` → `"32"`. A path with no separator returns
    /// itself.
    pub fn section(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for CitationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CitationPath {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}
