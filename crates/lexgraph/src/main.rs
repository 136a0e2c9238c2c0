use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use lexgraph_core::{metrics, scc, sequence, GraphOptions, RefGraph};
use lexgraph_schemas::SequenceEntry;
use mimalloc::MiMalloc;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Analyze statutory cross-reference structure to derive an encoding
/// order in which every section's dependencies precede it.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the encoding sequence from a USC title file
    ///
    /// Loads a USLM XML file, builds the cross-reference graph, and emits
    /// the full dependency-ordered sequence.
    Sequence {
        /// Path to a US Code XML file (USLM format)
        xml_path: PathBuf,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print graph statistics for a USC title file
    Stats {
        /// Path to a US Code XML file (USLM format)
        xml_path: PathBuf,
    },

    /// Compare candidate orderings by forward-reference count
    ///
    /// Scores the computed sequence against ascending section number, a
    /// fixed-seed shuffle, and the reversed sequence. A forward reference
    /// is a dependency of a section that has not been encoded when the
    /// section itself is.
    Compare {
        /// Path to a US Code XML file (USLM format)
        xml_path: PathBuf,

        /// Output JSON file (writes the report to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

/// One sequence row as exported: `section` is the last path segment,
/// kept alongside the full citation path as a display shorthand.
#[derive(Serialize)]
struct SequenceRow {
    order: usize,
    section: String,
    citation_path: String,
    dependencies: usize,
    dependents: usize,
    scc_size: usize,
}

impl From<SequenceEntry> for SequenceRow {
    fn from(entry: SequenceEntry) -> Self {
        Self {
            order: entry.order,
            section: entry.citation_path.section().to_owned(),
            citation_path: entry.citation_path.as_str().to_owned(),
            dependencies: entry.dependencies,
            dependents: entry.dependents,
            scc_size: entry.scc_size,
        }
    }
}

/// Forward-reference score for one candidate ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct OrderingScore {
    /// Dependencies encountered before their target was encoded.
    total_forward_refs: usize,
    /// Share of sections whose dependencies were all already encoded.
    pct_clean: f64,
}

#[derive(Serialize)]
struct ComparisonReport {
    optimal: OrderingScore,
    numerical: OrderingScore,
    shuffled: OrderingScore,
    reverse_optimal: OrderingScore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging. Output goes to stderr so JSON output
    // on stdout remains clean for piping. Default to warn, allowlist our crates.
    const CRATES: &[&str] = &[
        "lexgraph",
        "lexgraph_core",
        "lexgraph_extract",
        "lexgraph_schemas",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .init();

    match cli.command {
        Commands::Sequence {
            xml_path,
            output,
            format,
        } => {
            let graph = load_graph(&xml_path)?;
            let sccs = scc::decompose(&graph);
            let entries = sequence::sequence(&graph, &sccs)?;
            info!(sections = entries.len(), "Computed encoding sequence");

            let rows: Vec<SequenceRow> =
                entries.into_iter().map(SequenceRow::from).collect();
            let mut writer = open_output(output.as_deref())?;
            match format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut writer, &rows)?;
                    writeln!(writer)?;
                }
                OutputFormat::Csv => write_csv(&mut writer, &rows)?,
            }
            writer.flush()?;
            Ok(())
        }
        Commands::Stats { xml_path } => {
            let graph = load_graph(&xml_path)?;
            let sccs = scc::decompose(&graph);

            let mut writer = open_output(None)?;
            write_stats(&mut writer, &graph, &sccs)?;
            writer.flush()?;
            Ok(())
        }
        Commands::Compare { xml_path, output } => {
            let graph = load_graph(&xml_path)?;
            let sccs = scc::decompose(&graph);
            let entries = sequence::sequence(&graph, &sccs)?;
            let report = compare_orderings(&graph, &entries);

            let mut writer = open_output(output.as_deref())?;
            if output.is_some() {
                serde_json::to_writer_pretty(&mut writer, &report)?;
                writeln!(writer)?;
            } else {
                write_comparison(&mut writer, &report)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

fn load_graph(xml_path: &Path) -> Result<RefGraph> {
    let extracted = lexgraph_extract::load_title(xml_path)
        .with_context(|| format!("failed to load {}", xml_path.display()))?;
    let graph = RefGraph::build(
        &extracted.nodes,
        &extracted.edges,
        GraphOptions::default(),
    )?;
    info!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "Built cross-reference graph"
    );
    Ok(graph)
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(path).with_context(|| {
                format!("failed to create {}", path.display())
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    })
}

fn write_csv(writer: &mut dyn Write, rows: &[SequenceRow]) -> Result<()> {
    writeln!(
        writer,
        "order,section,citation_path,dependencies,dependents,scc_size"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            row.order,
            row.section,
            row.citation_path,
            row.dependencies,
            row.dependents,
            row.scc_size
        )?;
    }
    Ok(())
}

fn write_stats(
    writer: &mut dyn Write,
    graph: &RefGraph,
    sccs: &[Vec<usize>],
) -> Result<()> {
    let summary = metrics::summary(graph, sccs);
    let components = metrics::component_stats(sccs);
    let depth = metrics::max_depth(graph, sccs)?;

    writeln!(writer, "{}", "=".repeat(50))?;
    writeln!(writer, "STATUTE GRAPH STATISTICS")?;
    writeln!(writer, "{}", "=".repeat(50))?;
    writeln!(writer, "Sections (nodes):         {}", summary.num_nodes)?;
    writeln!(writer, "Cross-references (edges): {}", summary.num_edges)?;
    writeln!(
        writer,
        "Raw references:           {}",
        graph.raw_references()
    )?;
    writeln!(writer, "Graph density:            {:.4}", summary.density)?;
    writeln!(
        writer,
        "Avg dependencies:         {:.1}",
        summary.avg_in_degree
    )?;
    writeln!(writer, "Max dependency depth:     {depth}")?;
    writeln!(writer, "SCCs:                     {}", summary.num_scc)?;
    writeln!(
        writer,
        "Multi-node SCCs (cycles): {}",
        components.num_cycles
    )?;
    writeln!(writer, "Largest SCC:              {}", components.largest)?;

    writeln!(writer, "\nTop 5 hubs:")?;
    for hub in metrics::hubs(graph, 5) {
        writeln!(
            writer,
            "  §{}: {} dependents",
            hub.citation_path.section(),
            hub.dependents
        )?;
    }
    Ok(())
}

fn compare_orderings(
    graph: &RefGraph,
    entries: &[SequenceEntry],
) -> ComparisonReport {
    let optimal: Vec<usize> = entries
        .iter()
        .map(|e| {
            graph
                .index_of(&e.citation_path)
                .expect("sequence entries name graph nodes")
        })
        .collect();

    ComparisonReport {
        optimal: forward_refs(graph, &optimal),
        numerical: forward_refs(graph, &numerical_order(graph)),
        shuffled: forward_refs(graph, &shuffled(&optimal)),
        reverse_optimal: forward_refs(
            graph,
            &optimal.iter().rev().copied().collect::<Vec<_>>(),
        ),
    }
}

/// Scores an ordering: every dependency not yet encoded when its
/// dependent is reached counts as one forward reference. A self-loop is
/// always a forward reference, since a section is encoded only after its
/// own dependencies are counted.
fn forward_refs(graph: &RefGraph, order: &[usize]) -> OrderingScore {
    if order.is_empty() {
        return OrderingScore {
            total_forward_refs: 0,
            pct_clean: 100.0,
        };
    }

    let mut encoded: HashSet<usize> = HashSet::with_capacity(order.len());
    let mut total = 0usize;
    let mut clean = 0usize;
    for &node in order {
        let unmet = graph
            .dependency_indices(node)
            .filter(|dep| !encoded.contains(dep))
            .count();
        total += unmet;
        if unmet == 0 {
            clean += 1;
        }
        encoded.insert(node);
    }
    OrderingScore {
        total_forward_refs: total,
        pct_clean: clean as f64 / order.len() as f64 * 100.0,
    }
}

/// Sections in ascending section-number order, the order a statute book
/// prints them in. Non-numeric sections sort last; ties break by citation
/// path.
fn numerical_order(graph: &RefGraph) -> Vec<usize> {
    graph
        .node_indices()
        .sorted_by_key(|&i| {
            let path = graph.citation(i);
            (section_number(path.section()), path.clone())
        })
        .collect()
}

/// Numeric portion of a section shorthand: `280A` → 280. Sections with no
/// digits sort after all numbered ones.
fn section_number(section: &str) -> u64 {
    let digits: String =
        section.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(u64::MAX)
}

/// Fisher-Yates with a fixed-seed xorshift, so repeated runs score the
/// same shuffled ordering.
fn shuffled(order: &[usize]) -> Vec<usize> {
    let mut state: u64 = 0x2545F491_4F6CDD1D;
    let mut out = order.to_vec();
    for i in (1..out.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        out.swap(i, j);
    }
    out
}

fn write_comparison(
    writer: &mut dyn Write,
    report: &ComparisonReport,
) -> Result<()> {
    let rows = [
        ("Optimal (topological)", &report.optimal),
        ("Numerical (§1, §2, ...)", &report.numerical),
        ("Shuffled (fixed seed)", &report.shuffled),
        ("Reverse optimal", &report.reverse_optimal),
    ];

    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(writer, "ENCODING ORDER COMPARISON")?;
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(
        writer,
        "{:<25} {:<15} {:<10}",
        "Order", "Forward refs", "% clean"
    )?;
    writeln!(writer, "{}", "-".repeat(60))?;
    for (name, score) in rows {
        writeln!(
            writer,
            "{:<25} {:<15} {:.1}%",
            name, score.total_forward_refs, score.pct_clean
        )?;
    }
    Ok(())
}
