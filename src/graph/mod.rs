//! Lock-dependency graphs.
//!
//! A [`LockGraph`] is a directed graph with unique edges over string lock
//! identities; an edge `L1 -> L2` means "there exists a program point at
//! which a thread holds L1 and acquires L2". Per-function graphs key nodes
//! by the fully-qualified identity `TYPE:SITE` (distinguishing instances
//! declared at different sites); the merged global graph keys by the
//! canonical identity - the type alone - so all instances of a
//! monitor-bearing type collapse to one node. The collapse over-approximates:
//! two distinct locks of one type acquired in a fixed order are
//! indistinguishable from a genuine cycle.
//!
//! Nodes are interned in insertion order and successor sets are ordered by
//! node index, so traversals and renderings are deterministic across runs.

pub mod cycles;

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::types::{FunctionDecl, Statement};

/// Directed graph over lock identities with unique edges.
///
/// Self-edges are legal and meaningful: a monitor region nested in a region
/// of the same canonical type is exactly the swap-deadlock signal.
#[derive(Debug, Clone, Default)]
pub struct LockGraph {
    /// Node names in insertion order (index -> name).
    nodes: Vec<String>,
    /// Node name to index mapping.
    node_indices: FxHashMap<String, usize>,
    /// Adjacency: node index -> ordered set of successor indices.
    edges: FxHashMap<usize, BTreeSet<usize>>,
}

impl LockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node, returning its index.
    fn add_node(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Add the edge `from -> to`, interning both endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.edges.entry(from_idx).or_default().insert(to_idx);
    }

    /// Node name by index.
    pub(crate) fn node_name(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    /// Successor indices of `idx`, in node-index order.
    pub(crate) fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.get(&idx).into_iter().flatten().copied()
    }

    /// Indices of nodes with at least one outgoing edge, in insertion order.
    pub(crate) fn source_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|idx| self.edges.contains_key(idx))
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|e| e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All edges as `(from, to)` name pairs: sources in insertion order,
    /// successors in node-index order.
    pub fn edge_list(&self) -> Vec<(String, String)> {
        let mut list = Vec::with_capacity(self.edge_count());
        for from in self.source_nodes() {
            for to in self.successors(from) {
                list.push((self.nodes[from].clone(), self.nodes[to].clone()));
            }
        }
        list
    }

    /// Whether the edge `from -> to` is present.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(f), Some(t)) => self.edges.get(f).is_some_and(|succ| succ.contains(t)),
            _ => false,
        }
    }
}

// =============================================================================
// LOCK IDENTITY
// =============================================================================

/// Fully-qualified lock identity of a resolved monitor: `TYPE:SITE`.
///
/// Falls back to the raw expression text when the resolver left the monitor
/// unannotated; the degraded identity is used for equality only.
fn lock_identity(expression: &str, object_type: &Option<String>, declared_at: &Option<String>) -> String {
    match (object_type, declared_at) {
        (Some(ty), Some(site)) => format!("{ty}:{site}"),
        _ => expression.to_string(),
    }
}

/// Canonical identity: the type part of `TYPE:SITE` (the whole string when
/// there is no `:`).
pub fn canonical(identity: &str) -> &str {
    match identity.split_once(':') {
        Some((ty, _)) => ty,
        None => identity,
    }
}

// =============================================================================
// GRAPH BUILDING
// =============================================================================

/// Build the per-function lock-dependency graph.
///
/// Walks the statement tree in source order carrying a lock stack whose top
/// is the most recently acquired identity. Entering a monitor region with
/// identity L emits `top -> L` (when a lock is held) and pushes L for the
/// region's extent. A wait operation with identity W emits `top -> W` only
/// when `top != W`, and never pushes: wait releases and later re-acquires
/// its own monitor, so the operation itself contributes no nested holding.
pub fn function_graph(func: &FunctionDecl) -> LockGraph {
    let mut graph = LockGraph::new();
    let mut lock_stack: Vec<String> = Vec::new();
    visit_statements(&func.body, &mut lock_stack, &mut graph);
    graph
}

fn visit_statements(statements: &[Statement], lock_stack: &mut Vec<String>, graph: &mut LockGraph) {
    for stmt in statements {
        match stmt {
            Statement::MonitorRegion {
                expression,
                object_type,
                declared_at,
                body,
                ..
            } => {
                let identity = lock_identity(expression, object_type, declared_at);
                if let Some(top) = lock_stack.last() {
                    graph.add_edge(top, &identity);
                }
                lock_stack.push(identity);
                visit_statements(body, lock_stack, graph);
                lock_stack.pop();
            }
            Statement::WaitOperation {
                target,
                object_type,
                declared_at,
                ..
            } => {
                let identity = lock_identity(target, object_type, declared_at);
                if let Some(top) = lock_stack.last() {
                    if *top != identity {
                        graph.add_edge(top, &identity);
                    }
                }
            }
            Statement::Generic { .. } | Statement::VariableDeclaration { .. } => {}
        }
    }
}

/// Merge the per-function graphs of `functions` into one global graph,
/// canonicalising every endpoint to its type.
pub fn merged_graph(functions: &[FunctionDecl]) -> LockGraph {
    let mut merged = LockGraph::new();
    for func in functions {
        let local = function_graph(func);
        for (from, to) in local.edge_list() {
            merged.add_edge(canonical(&from), canonical(&to));
        }
    }
    debug!(
        "merged graph: {} nodes, {} edges from {} functions",
        merged.node_count(),
        merged.edge_count(),
        functions.len()
    );
    merged
}
