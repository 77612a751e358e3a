//! Lexical scoping for variable bindings.
//!
//! Scopes are copy-on-enter: a block's scope starts as a clone of its
//! parent's, so inner declarations (and shadowing) are visible downward but
//! never leak into a sibling block or back out of the block.

use rustc_hash::FxHashMap;

/// A variable binding: declared type and 1-origin declaration line.
///
/// Formal parameters are bound at the enclosing function's header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Declared type, possibly including `<...>` or `[]`
    pub var_type: String,
    /// 1-origin line of the declaration
    pub line: usize,
}

/// One lexical scope frame mapping variable name to its binding.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child scope seeded with every binding visible here.
    pub fn enter(&self) -> Self {
        self.clone()
    }

    /// Bind `name` in this scope, shadowing any inherited binding.
    pub fn bind(&mut self, name: &str, var_type: &str, line: usize) {
        self.bindings.insert(
            name.to_string(),
            Binding {
                var_type: var_type.to_string(),
                line,
            },
        );
    }

    /// Look `name` up in this scope chain.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }
}
