//! Pretty-printing of the syntactic model.
//!
//! Renders statements and functions in the `Line N: ...` layout used by the
//! text report. Monitor regions and wait operations that the resolver
//! annotated carry their lock identity inline as a
//! `/* type: T, declared at: S */` comment; unresolved ones render verbatim.

use std::fmt::Write;

use crate::ast::types::{FunctionDecl, Parameter, Statement};

const INDENT: &str = "    ";

/// Render one statement (and, for monitor regions, its body) into `out`.
///
/// `depth` is the nesting depth; every line is prefixed with one indent unit
/// per level and terminated with a newline.
pub fn render_statement(stmt: &Statement, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match stmt {
        Statement::Generic { line, text } => {
            let _ = writeln!(out, "{pad}Line {line}: {text}");
        }
        Statement::VariableDeclaration {
            line,
            var_type,
            name,
        } => {
            let _ = writeln!(out, "{pad}Line {line}: {var_type} {name};");
        }
        Statement::MonitorRegion {
            line,
            expression,
            object_type,
            declared_at,
            body,
        } => {
            match (object_type, declared_at) {
                (Some(ty), Some(site)) => {
                    let _ = writeln!(
                        out,
                        "{pad}Line {line}: synchronized({expression} /* type: {ty}, declared at: {site} */) {{"
                    );
                }
                _ => {
                    let _ = writeln!(out, "{pad}Line {line}: synchronized({expression}) {{");
                }
            }
            for inner in body {
                render_statement(inner, depth + 1, out);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Statement::WaitOperation {
            line,
            target,
            object_type,
            declared_at,
        } => match (object_type, declared_at) {
            (Some(ty), Some(site)) => {
                let _ = writeln!(
                    out,
                    "{pad}Line {line}: {target}.wait() /* type: {ty}, declared at: {site} */;"
                );
            }
            _ => {
                let _ = writeln!(out, "{pad}Line {line}: {target}.wait();");
            }
        },
    }
}

/// Render a full function declaration: header line, body one statement per
/// indented line, closing brace.
pub fn render_function(func: &FunctionDecl) -> String {
    let mut out = String::new();
    let params = func
        .params
        .iter()
        .map(render_parameter)
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "Line {}: {} {}([{}]) {{",
        func.line, func.return_type, func.name, params
    );
    for stmt in &func.body {
        render_statement(stmt, 1, &mut out);
    }
    out.push_str("}\n");
    out
}

fn render_parameter(param: &Parameter) -> String {
    format!("{} {}", param.param_type, param.name)
}
