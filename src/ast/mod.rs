//! Syntactic model and pretty-printing.
//!
//! The model is what the line parser produces: a tree of [`Statement`]s per
//! function plus flat class-body-level statements. See [`types`] for the
//! data structures and [`printer`] for the `Line N: ...` rendering used by
//! the text report.

pub mod printer;
pub mod types;

pub use printer::{render_function, render_statement};
pub use types::{FunctionDecl, Parameter, Statement, GROUND_SITE};
