//! Line-oriented source parser.
//!
//! A regex-per-line recursive descent over physical source lines. Four line
//! shapes are recognised - function headers (top level only), monitor-region
//! headers, wait operations, and variable declarations; every other
//! non-empty, non-`}` line is kept as an opaque generic statement. A block
//! terminates at the first line whose trimmed content is exactly `}`.
//!
//! The parser is purely syntactic: it assumes one statement per
//! physical line and does not track string or comment context, so it can be
//! fooled by multi-line statements, inline braces, string literals containing
//! `}`, and comments. Malformed input never aborts a run - on EOF before a
//! closing brace the statements collected so far are returned.
//!
//! Monitor resolution happens inline, at the moment a region or wait is
//! emitted, against the scope visible at that site; no post-pass is needed.

pub mod scope;

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::ast::types::{FunctionDecl, Parameter, Statement, GROUND_SITE};
use crate::error::{LockgraphError, Result};
use self::scope::Scope;

// =============================================================================
// LINE PATTERNS
// =============================================================================

/// First match in a file names the ambient class.
static CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"class\s+(\w+)").expect("Invalid regex"));

/// `(<mods>)* <return-type> <name> ( <params> ) (throws ...)? {`
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((?:(?:public|protected|private|static|final|abstract|synchronized)\s+)*)([\w<>\[\]]+)\s+(\w+)\s*\(([^)]*)\)\s*(?:throws\s+[\w\s,]+)?\s*\{",
    )
    .expect("Invalid regex")
});

/// `synchronized ( <expr> ) {` - inner parentheses not supported.
static MONITOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"synchronized\s*\(([^)]+)\)\s*\{").expect("Invalid regex"));

/// `<ident>.wait();` or bare `wait();` - the argument list must be empty,
/// so timed-wait forms are not recognised.
static WAIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:(\w+)\s*\.\s*)?\bwait\s*\(\s*\)\s*;").expect("Invalid regex"));

/// `<type> <name> [= <init>];` - the type may include `<...>` or `[]`.
static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w<>\[\]]+)\s+(\w+)\s*(?:=\s*[^;]+)?;").expect("Invalid regex"));

/// A monitor expression that is a bare identifier, resolvable in scope.
static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("Invalid regex"));

/// Ambient class name used before any class declaration has been seen.
const UNKNOWN_CLASS: &str = "Unknown";

// =============================================================================
// PARSER
// =============================================================================

/// Accumulating source parser.
///
/// One parser instance serves a whole analysis run: functions, class-body
/// statements, and the class-level symbol table accumulate across
/// [`parse_file`](Self::parse_file) calls, and a later file's class name
/// overwrites the ambient class for statements parsed thereafter. Construct
/// a fresh parser to reset.
#[derive(Debug)]
pub struct SourceParser {
    ambient_class: String,
    functions: Vec<FunctionDecl>,
    global_statements: Vec<Statement>,
    global_scope: Scope,
}

impl SourceParser {
    pub fn new() -> Self {
        Self {
            ambient_class: UNKNOWN_CLASS.to_string(),
            functions: Vec::new(),
            global_statements: Vec::new(),
            global_scope: Scope::new(),
        }
    }

    /// Read and parse one source file.
    ///
    /// Only I/O can fail; parse-level irregularities are recovered silently.
    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        let source =
            fs::read_to_string(path).map_err(|e| LockgraphError::io_with_path(e, path))?;
        debug!("parsing {}", path.display());
        self.parse_source(&source);
        Ok(())
    }

    /// Parse source text already in memory.
    pub fn parse_source(&mut self, source: &str) {
        let lines: Vec<&str> = source.lines().collect();

        if let Some(name) = lines
            .iter()
            .find_map(|l| CLASS_RE.captures(l))
            .map(|caps| caps[1].to_string())
        {
            debug!("ambient class is now {}", name);
            self.ambient_class = name;
        }

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();
            if line.is_empty() {
                i += 1;
                continue;
            }

            if let Some(caps) = FUNCTION_RE.captures(line) {
                i = self.parse_function(&lines, i, &caps);
                continue;
            }

            if let Some(caps) = MONITOR_RE.captures(line) {
                let expression = caps[1].trim().to_string();
                let header_line = i + 1;
                let (body, close) = self.parse_block(&lines, i + 1, &self.global_scope);
                let (object_type, declared_at) = self.resolve(&expression, &self.global_scope);
                self.global_statements.push(Statement::MonitorRegion {
                    line: header_line,
                    expression,
                    object_type,
                    declared_at,
                    body,
                });
                i = close + 1;
                continue;
            }

            if let Some(caps) = WAIT_RE.captures(line) {
                let target = caps
                    .get(1)
                    .map_or_else(|| "this".to_string(), |m| m.as_str().to_string());
                let (object_type, declared_at) = self.resolve(&target, &self.global_scope);
                self.global_statements.push(Statement::WaitOperation {
                    line: i + 1,
                    target,
                    object_type,
                    declared_at,
                });
                i += 1;
                continue;
            }

            if let Some(caps) = VARIABLE_RE.captures(line) {
                let var_type = caps[1].to_string();
                let name = caps[2].to_string();
                self.global_scope.bind(&name, &var_type, i + 1);
                self.global_statements.push(Statement::VariableDeclaration {
                    line: i + 1,
                    var_type,
                    name,
                });
                i += 1;
                continue;
            }

            // Class closer.
            if line == "}" {
                i += 1;
                continue;
            }

            self.global_statements.push(Statement::Generic {
                line: i + 1,
                text: line.to_string(),
            });
            i += 1;
        }
    }

    /// Parse a function header at line index `i` plus its body; returns the
    /// index to resume scanning from.
    fn parse_function(&mut self, lines: &[&str], i: usize, caps: &regex::Captures<'_>) -> usize {
        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        let return_type = caps[2].to_string();
        let name = caps[3].to_string();
        let params = parse_parameters(&caps[4]);
        let header_line = i + 1;
        let is_monitor_method = modifiers.split_whitespace().any(|m| m == "synchronized");

        // Parameters behave as if declared at the header line.
        let mut fn_scope = Scope::new();
        for p in &params {
            fn_scope.bind(&p.name, &p.param_type, header_line);
        }

        let (parsed_body, close) = self.parse_block(lines, i + 1, &fn_scope);
        let body = if is_monitor_method {
            vec![Statement::MonitorRegion {
                line: header_line,
                expression: "this".to_string(),
                object_type: Some(self.ambient_class.clone()),
                declared_at: Some(GROUND_SITE.to_string()),
                body: parsed_body,
            }]
        } else {
            parsed_body
        };

        debug!(
            "parsed function {} at line {} ({} params)",
            name,
            header_line,
            params.len()
        );
        self.functions.push(FunctionDecl {
            class_name: self.ambient_class.clone(),
            return_type,
            name,
            params,
            line: header_line,
            body,
            is_monitor_method,
        });
        close + 1
    }

    /// Recursively parse a block starting at line index `start`.
    ///
    /// Returns the statements of the block and the index of the line holding
    /// the terminating `}` (or `lines.len()` when EOF arrived first).
    fn parse_block(&self, lines: &[&str], start: usize, parent: &Scope) -> (Vec<Statement>, usize) {
        let mut block_scope = parent.enter();
        let mut statements = Vec::new();
        let mut i = start;

        while i < lines.len() {
            let line = lines[i].trim();
            if line == "}" {
                return (statements, i);
            }
            if line.is_empty() {
                i += 1;
                continue;
            }

            // Monitor detection runs before variable detection, so
            // `synchronized (x) {` is never misread as a declaration.
            if let Some(caps) = MONITOR_RE.captures(line) {
                let expression = caps[1].trim().to_string();
                let header_line = i + 1;
                let (body, close) = self.parse_block(lines, i + 1, &block_scope);
                let (object_type, declared_at) = self.resolve(&expression, &block_scope);
                trace!("monitor region on `{}` at line {}", expression, header_line);
                statements.push(Statement::MonitorRegion {
                    line: header_line,
                    expression,
                    object_type,
                    declared_at,
                    body,
                });
                i = close + 1;
                continue;
            }

            if let Some(caps) = WAIT_RE.captures(line) {
                let target = caps
                    .get(1)
                    .map_or_else(|| "this".to_string(), |m| m.as_str().to_string());
                let (object_type, declared_at) = self.resolve(&target, &block_scope);
                statements.push(Statement::WaitOperation {
                    line: i + 1,
                    target,
                    object_type,
                    declared_at,
                });
                i += 1;
                continue;
            }

            if let Some(caps) = VARIABLE_RE.captures(line) {
                let var_type = caps[1].to_string();
                let name = caps[2].to_string();
                block_scope.bind(&name, &var_type, i + 1);
                statements.push(Statement::VariableDeclaration {
                    line: i + 1,
                    var_type,
                    name,
                });
                i += 1;
                continue;
            }

            statements.push(Statement::Generic {
                line: i + 1,
                text: line.to_string(),
            });
            i += 1;
        }

        (statements, i)
    }

    /// Resolve a monitor expression against `scope`.
    ///
    /// `this` resolves to the ambient class at site `ground`; a bare
    /// identifier resolves through the scope chain; anything else stays
    /// unresolved and downstream identity derivation falls back to the raw
    /// expression text.
    fn resolve(&self, expression: &str, scope: &Scope) -> (Option<String>, Option<String>) {
        if expression == "this" {
            return (
                Some(self.ambient_class.clone()),
                Some(GROUND_SITE.to_string()),
            );
        }
        if IDENTIFIER_RE.is_match(expression) {
            if let Some(binding) = scope.lookup(expression) {
                return (Some(binding.var_type.clone()), Some(binding.line.to_string()));
            }
        }
        (None, None)
    }

    /// Ambient class currently in effect.
    pub fn ambient_class(&self) -> &str {
        &self.ambient_class
    }

    /// Functions parsed so far, in source order.
    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions
    }

    /// Class-body-level statements parsed so far.
    pub fn global_statements(&self) -> &[Statement] {
        &self.global_statements
    }

    /// Consume the parser, yielding functions and global statements.
    pub fn into_parts(self) -> (Vec<FunctionDecl>, Vec<Statement>) {
        (self.functions, self.global_statements)
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a raw parameter list on commas, each part on whitespace; a part
/// contributes a parameter only when it yields at least two tokens.
fn parse_parameters(raw: &str) -> Vec<Parameter> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .filter_map(|part| {
            let mut tokens = part.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(ty), Some(name)) => Some(Parameter {
                    param_type: ty.to_string(),
                    name: name.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
