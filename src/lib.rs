//! lockgraph - static deadlock detection for monitor-based sources.
//!
//! Analyses brace-delimited, Java-style sources that use monitor-style
//! intrinsic locking (`synchronized` blocks and methods) and flags potential
//! deadlocks by finding cycles in an inter-procedural lock-acquisition
//! order graph. A reported cycle is a necessary, not sufficient, condition
//! for deadlock, so false positives occur.
//!
//! # Architecture
//!
//! The pipeline runs in four stages:
//!
//! - **Parse** ([`parser`]): a regex-per-line recursive descent produces a
//!   simplified statement tree per function, resolving each monitor
//!   expression to a (type, declaration-site) lock identity as it goes
//! - **Model** ([`ast`]): the statement/function data types and their
//!   `Line N: ...` pretty-printing
//! - **Graph** ([`graph`]): per-function lock-dependency graphs from a
//!   lock-stack walk, merged into one global graph over canonical
//!   (per-type) identities, plus the cycle dump
//! - **Report** ([`analyzer`]): the end-to-end entry points and the fixed
//!   text layout
//!
//! # Quick Start
//!
//! ```no_run
//! use lockgraph::{analyze_files, format_report};
//!
//! let report = analyze_files(&["Worker.java", "Account.java"])?;
//! print!("{}", format_report(&report));
//! if !report.cycles.is_empty() {
//!     eprintln!("{} potential deadlock path(s)", report.cycles.len());
//! }
//! # Ok::<(), lockgraph::LockgraphError>(())
//! ```

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod graph;
pub mod parser;

pub use analyzer::{
    analyze_files, analyze_source, format_report, DeadlockReport, FunctionGraphReport,
};
pub use ast::types::{FunctionDecl, Parameter, Statement};
pub use error::{LockgraphError, Result};
pub use graph::{canonical, function_graph, merged_graph, LockGraph};
pub use parser::SourceParser;
