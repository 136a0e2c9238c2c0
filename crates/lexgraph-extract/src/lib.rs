//! Statute extraction from USLM XML.
//!
//! Reads United States Code title files in the USLM schema
//! (`http://xml.house.gov/schemas/uslm/1.0`) and produces the node and
//! edge lists the graph engine consumes. Extraction is two-pass: the
//! first pass registers every `<section>` carrying a parseable
//! `identifier` attribute, the second walks each section's `<ref>`
//! elements and emits dependency edges.
//!
//! Edge policy follows the corpus shape rather than strict resolution:
//! a reference to a section of the *same* title is always kept, with the
//! target auto-registered if the first pass missed it (repealed and
//! reserved sections are referenced long after they stop appearing in
//! the file). A reference into *another* title is kept only when that
//! target is already known, so a single-title extraction does not sprout
//! dangling nodes for the rest of the Code.
//!
//! Unparseable identifiers and hrefs are skipped, not fatal; only I/O
//! and malformed XML abort extraction.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexSet;
use lexgraph_schemas::{CitationPath, ExtractedRefs, ReferenceEdge};
use regex::Regex;
use tracing::{debug, info};

mod error;

pub use crate::error::ExtractError;

const USLM_NS: &str = "http://xml.house.gov/schemas/uslm/1.0";

/// Recognizes USC identifiers and hrefs: `/us/usc/t{title}/s{num}` with
/// an optional single-letter suffix on the section number and an
/// optional trailing subsection path. Prefix match; trailing material
/// that is not a `/`-led subsection path is ignored.
static USC_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/us/usc/t(\d+)/s(\d+[A-Za-z]?)(?:/(.+))?")
        .expect("USC reference pattern is valid")
});

/// A parsed USC citation: title number plus section path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UscCitation {
    /// Title number, e.g. `26`.
    pub title: String,
    /// Section number, with any subsection path appended, e.g. `151/a`.
    pub section: String,
}

impl UscCitation {
    /// Normalized citation path: `us/statute/{title}/{section}`.
    pub fn citation_path(&self) -> CitationPath {
        CitationPath::new(format!("us/statute/{}/{}", self.title, self.section))
    }
}

/// Parses a USC identifier or href such as `/us/usc/t26/s151/a`.
///
/// Returns `None` for anything that is not a USC section reference
/// (CFR citations, public-law citations, fragment-only links).
pub fn parse_usc_identifier(href: &str) -> Option<UscCitation> {
    let captures = USC_REF_RE.captures(href)?;
    let title = captures[1].to_owned();
    let section = match captures.get(3) {
        Some(subsection) => format!("{}/{}", &captures[2], subsection.as_str()),
        None => captures[2].to_owned(),
    };
    Some(UscCitation { title, section })
}

/// Accumulates sections and references across one or more USLM
/// documents. Later documents may resolve cross-title references into
/// sections registered by earlier ones.
#[derive(Debug, Default)]
pub struct Extractor {
    nodes: IndexSet<CitationPath>,
    edges: Vec<ReferenceEdge>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one USLM document and folds its sections and references
    /// into the accumulator.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not well-formed XML.
    pub fn ingest(&mut self, xml: &str) -> Result<(), ExtractError> {
        let document = roxmltree::Document::parse(xml)?;
        let root = document.root_element();

        let sections_before = self.nodes.len();
        let edges_before = self.edges.len();

        // First pass: register every section with a parseable identifier.
        for section in root.descendants().filter(|n| is_uslm(n, "section")) {
            let Some(citation) = section
                .attribute("identifier")
                .and_then(parse_usc_identifier)
            else {
                continue;
            };
            self.nodes.insert(citation.citation_path());
        }

        // Second pass: walk each section's refs and emit edges.
        for section in root.descendants().filter(|n| is_uslm(n, "section")) {
            let Some(source) = section
                .attribute("identifier")
                .and_then(parse_usc_identifier)
            else {
                continue;
            };
            let source_path = source.citation_path();

            for href in section
                .descendants()
                .filter(|n| is_uslm(n, "ref"))
                .filter_map(|n| n.attribute("href"))
            {
                let Some(target) = parse_usc_identifier(href) else {
                    continue;
                };
                let target_path = target.citation_path();

                if target.title == source.title {
                    // Same title: keep, auto-registering the target.
                    self.nodes.insert(target_path.clone());
                } else if !self.nodes.contains(&target_path) {
                    // Cross-title reference to an unknown section.
                    continue;
                }
                self.edges
                    .push(ReferenceEdge::new(source_path.clone(), target_path));
            }
        }

        debug!(
            sections = self.nodes.len() - sections_before,
            references = self.edges.len() - edges_before,
            "Ingested USLM document"
        );
        Ok(())
    }

    /// Consumes the accumulator and returns the extracted node and edge
    /// lists, in document order.
    pub fn finish(self) -> ExtractedRefs {
        ExtractedRefs {
            nodes: self.nodes.into_iter().collect(),
            edges: self.edges,
        }
    }
}

/// Extracts sections and references from a single in-memory USLM
/// document.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn parse_uslm(xml: &str) -> Result<ExtractedRefs, ExtractError> {
    let mut extractor = Extractor::new();
    extractor.ingest(xml)?;
    Ok(extractor.finish())
}

/// Loads a single USC title file, e.g. `usc26.xml`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not well-formed
/// XML.
pub fn load_title(path: &Path) -> Result<ExtractedRefs, ExtractError> {
    let xml = fs::read_to_string(path)?;
    let extracted = parse_uslm(&xml)?;
    info!(
        path = %path.display(),
        sections = extracted.nodes.len(),
        references = extracted.edges.len(),
        "Loaded USC title"
    );
    Ok(extracted)
}

/// Loads every `usc{N}.xml` file in a directory into one combined
/// extraction, in ascending filename order.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or any matching
/// file fails to read or parse.
pub fn load_directory(dir: &Path) -> Result<ExtractedRefs, ExtractError> {
    static TITLE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^usc\d+\.xml$").expect("title filename pattern is valid")
    });

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| TITLE_FILE_RE.is_match(name))
        })
        .collect();
    paths.sort();

    let mut extractor = Extractor::new();
    for path in &paths {
        let xml = fs::read_to_string(path)?;
        extractor.ingest(&xml)?;
    }

    let extracted = extractor.finish();
    info!(
        dir = %dir.display(),
        titles = paths.len(),
        sections = extracted.nodes.len(),
        references = extracted.edges.len(),
        "Loaded USC corpus"
    );
    Ok(extracted)
}

fn is_uslm(node: &roxmltree::Node<'_, '_>, tag: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == tag
        && node.tag_name().namespace() == Some(USLM_NS)
}
