//! Syntactic model types.
//!
//! Core data structures for the simplified source model extracted by the
//! line parser: statements, functions, and parameters. The model is
//! shallow - anything the analyser does not understand is kept as an opaque
//! generic statement rather than rejected.

use serde::{Deserialize, Serialize};

/// Declaration-site tag for a monitor object referenced through `this`.
pub const GROUND_SITE: &str = "ground";

/// A single parsed statement.
///
/// Every variant carries the 1-origin source line it was read from. Monitor
/// regions and wait operations additionally carry the resolver's annotation:
/// the declared type of the monitor object and its declaration-site tag
/// (a source line rendered as text, or [`GROUND_SITE`] for `this`). Both
/// stay `None` when the monitor expression could not be resolved to a known
/// variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// A line the analyser treats as opaque.
    Generic {
        /// 1-origin source line
        line: usize,
        /// Raw trimmed text of the line
        text: String,
    },

    /// A local or class-level variable declaration.
    VariableDeclaration {
        /// 1-origin source line
        line: usize,
        /// Declared type, possibly including `<...>` or `[]`
        var_type: String,
        /// Variable name
        name: String,
    },

    /// A monitor-protected region (`synchronized (expr) { ... }`).
    MonitorRegion {
        /// 1-origin source line of the region header
        line: usize,
        /// Monitor expression, verbatim from between the parentheses
        expression: String,
        /// Declared type of the monitor object, when resolved
        object_type: Option<String>,
        /// Declaration-site tag of the monitor object, when resolved
        declared_at: Option<String>,
        /// Statements enclosed by the region, in source order
        body: Vec<Statement>,
    },

    /// A wait operation (`target.wait();`, or bare `wait();` on `this`).
    WaitOperation {
        /// 1-origin source line of the call
        line: usize,
        /// Target expression; the literal `this` when the call was unqualified
        target: String,
        /// Declared type of the target object, when resolved
        object_type: Option<String>,
        /// Declaration-site tag of the target object, when resolved
        declared_at: Option<String>,
    },
}

impl Statement {
    /// 1-origin source line this statement was read from.
    pub fn line(&self) -> usize {
        match self {
            Statement::Generic { line, .. }
            | Statement::VariableDeclaration { line, .. }
            | Statement::MonitorRegion { line, .. }
            | Statement::WaitOperation { line, .. } => *line,
        }
    }
}

/// A formal parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared parameter type
    pub param_type: String,
    /// Parameter name
    pub name: String,
}

/// A parsed function or method declaration.
///
/// A monitor-method (declared with the `synchronized` modifier) keeps the
/// flag AND has its body wrapped in a single synthetic outer
/// [`Statement::MonitorRegion`] on `this`, so downstream traversals never
/// special-case it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Name of the class the function was parsed under
    pub class_name: String,
    /// Declared return type
    pub return_type: String,
    /// Function name
    pub name: String,
    /// Ordered formal parameters
    pub params: Vec<Parameter>,
    /// 1-origin line of the function header
    pub line: usize,
    /// Top-level statements of the body, in source order
    pub body: Vec<Statement>,
    /// Whether the function was declared with the `synchronized` modifier
    pub is_monitor_method: bool,
}
