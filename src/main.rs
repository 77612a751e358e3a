//! lockgraph CLI - static deadlock detection for monitor-based sources.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use lockgraph::{analyze_files, format_report, DeadlockReport};

/// Static deadlock detection via lock-order graphs.
///
/// Parses the given source files, derives "acquired while holding" edges
/// between monitor lock identities, merges them across functions, and
/// reports every cycle as a potential deadlock path.
#[derive(Parser)]
#[command(
    name = "lockgraph",
    version,
    about = "Static deadlock detection via lock-order graphs",
    long_about = r#"
Static deadlock detection via lock-order graphs.

Examples:
    lockgraph Worker.java                    # Analyse one file
    lockgraph A.java B.java --format json    # Machine-readable report
    lockgraph A.java --format dot | dot -Tpng -o locks.png

Files are parsed in argument order; a cycle in the merged lock-order graph
is a necessary (not sufficient) condition for deadlock, so expect false
positives on multi-instance locking."#
)]
struct Cli {
    /// Source files to analyse, in parse order
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output minified JSON (default: pretty-printed)
    #[arg(long)]
    compact: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Dot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity; diagnostics go to stderr so
    // stdout stays byte-stable.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let report = analyze_files(&cli.files)?;

    match cli.format {
        OutputFormat::Text => {
            print!("{}", format_report(&report));
        }
        OutputFormat::Json => {
            let json = if cli.compact {
                serde_json::to_string(&report)
            } else {
                serde_json::to_string_pretty(&report)
            }
            .context("Failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Dot => {
            print_dot(&report);
        }
    }

    // Summary to stderr, keeping stdout stable.
    if !report.cycles.is_empty() {
        eprintln!();
        eprintln!(
            "Detected {} potential deadlock path(s)",
            report.cycles.len()
        );
    }

    Ok(())
}

/// Render the merged lock-order graph as DOT.
fn print_dot(report: &DeadlockReport) {
    println!("digraph lock_order {{");
    println!("    rankdir=LR;");
    println!("    node [shape=box];");
    for (from, to) in &report.merged_edges {
        println!("    \"{from}\" -> \"{to}\";");
    }
    println!("}}");
}
