//! End-to-end deadlock analysis.
//!
//! Glues the pipeline together: parse every input file with one accumulating
//! [`SourceParser`], build the per-function lock-dependency graphs, merge
//! them into the canonical global graph, and dump its cycles. The result is
//! a serializable [`DeadlockReport`]; [`format_report`] renders it in the
//! fixed text layout, so identical inputs always produce identical bytes.

use std::fmt::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::printer::{render_function, render_statement};
use crate::ast::types::{FunctionDecl, Statement};
use crate::error::Result;
use crate::graph::{function_graph, merged_graph};
use crate::parser::SourceParser;

/// Edges of one function's local lock-dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionGraphReport {
    /// Function name
    pub function: String,
    /// `(from, to)` lock identity pairs, in graph order
    pub edges: Vec<(String, String)>,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockReport {
    /// Every parsed function, in source order
    pub functions: Vec<FunctionDecl>,
    /// Class-body-level statements, in source order
    pub global_statements: Vec<Statement>,
    /// Per-function graphs, one entry per parsed function
    pub function_graphs: Vec<FunctionGraphReport>,
    /// Edges of the merged global graph over canonical identities
    pub merged_edges: Vec<(String, String)>,
    /// Cycle dump of the merged graph; each entry ends with its closing
    /// node repeated
    pub cycles: Vec<Vec<String>>,
}

/// Analyse a set of source files.
///
/// Files are parsed in argument order by a single parser instance, so a
/// later file's class name stays ambient for statements parsed after it.
/// The only failure mode is I/O.
pub fn analyze_files<P: AsRef<Path>>(paths: &[P]) -> Result<DeadlockReport> {
    let mut parser = SourceParser::new();
    for path in paths {
        parser.parse_file(path.as_ref())?;
    }
    Ok(build_report(parser))
}

/// Analyse source text already in memory. Used by tests and embedders.
pub fn analyze_source(source: &str) -> DeadlockReport {
    let mut parser = SourceParser::new();
    parser.parse_source(source);
    build_report(parser)
}

fn build_report(parser: SourceParser) -> DeadlockReport {
    let (functions, global_statements) = parser.into_parts();

    let function_graphs = functions
        .iter()
        .map(|func| FunctionGraphReport {
            function: func.name.clone(),
            edges: function_graph(func).edge_list(),
        })
        .collect();

    let merged = merged_graph(&functions);
    let cycles = merged.cycles();
    debug!(
        "analysis complete: {} functions, {} merged edges, {} cycles",
        functions.len(),
        merged.edge_count(),
        cycles.len()
    );

    DeadlockReport {
        functions,
        global_statements,
        function_graphs,
        merged_edges: merged.edge_list(),
        cycles,
    }
}

// =============================================================================
// TEXT REPORT
// =============================================================================

/// Render the report in the fixed text layout.
pub fn format_report(report: &DeadlockReport) -> String {
    let mut out = String::new();

    out.push_str("---- Function Declarations ----\n");
    for func in &report.functions {
        out.push_str(&render_function(func));
        out.push('\n');
    }

    out.push_str("---- Global Statements ----\n");
    for stmt in &report.global_statements {
        render_statement(stmt, 0, &mut out);
    }
    out.push('\n');

    out.push_str("---- Lock-dependancy graphs (Local per Function) ----\n");
    for graph in &report.function_graphs {
        let _ = writeln!(out, "Function {}:", graph.function);
        out.push_str("Lock Order Graph:\n");
        for (from, to) in &graph.edges {
            let _ = writeln!(out, "  {from} -> {to}");
        }
        out.push('\n');
    }

    out.push_str("---- Merged global lock-dependancy graph ----\n");
    out.push_str("Lock Order Graph:\n");
    for (from, to) in &report.merged_edges {
        let _ = writeln!(out, "  {from} -> {to}");
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Potential deadlock paths: {}",
        format_cycle_list(&report.cycles)
    );
    out
}

/// `[[A, B, A], [B, A, B]]` - the bracketed cycle-list rendering.
fn format_cycle_list(cycles: &[Vec<String>]) -> String {
    let inner = cycles
        .iter()
        .map(|cycle| format!("[{}]", cycle.join(", ")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}
