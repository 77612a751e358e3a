//! Cycle enumeration over lock graphs.
//!
//! A depth-first walk that dumps every closed walk it encounters. Three
//! pieces of state are carried: a visited-forever set, an on-current-path
//! set, and the ordered path itself. When the walk reaches a node already on
//! the path, the path extended with that closing node is recorded - the
//! repeated node at the end makes the closure explicit, and the closing node
//! is not necessarily the first element of the recorded path.
//!
//! The visited-forever set is consulted but never extended at closure, so a
//! cycle can be reported once per start vertex that reaches it and branches
//! leading to already-closed cycles are re-walked. The result is a
//! best-effort cycle dump, not a canonical enumeration of simple cycles;
//! the existence of any entry is what makes deadlock possible.

use rustc_hash::FxHashSet;

use crate::graph::LockGraph;

/// DFS state for the cycle dump.
#[derive(Default)]
struct CycleState {
    /// Nodes retired from all future exploration.
    visited: FxHashSet<usize>,
    /// Nodes on the current DFS path (for O(1) membership).
    on_path: FxHashSet<usize>,
    /// The current DFS path, in order.
    path: Vec<usize>,
    /// Recorded cycles, each ending with its closing node repeated.
    cycles: Vec<Vec<usize>>,
}

impl LockGraph {
    /// Enumerate cycles through the graph.
    ///
    /// Start nodes are the nodes with outgoing edges, in insertion order;
    /// successors are explored in node-index order, so the dump is
    /// deterministic for a given build order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut state = CycleState::default();
        for start in self.source_nodes() {
            self.dump_cycles(start, &mut state);
        }
        state
            .cycles
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .map(|idx| self.node_name(idx).to_string())
                    .collect()
            })
            .collect()
    }

    fn dump_cycles(&self, node: usize, state: &mut CycleState) {
        if state.on_path.contains(&node) {
            let mut closed = state.path.clone();
            closed.push(node);
            state.cycles.push(closed);
            return;
        }
        if state.visited.contains(&node) {
            return;
        }
        state.on_path.insert(node);
        state.path.push(node);
        for succ in self.successors(node) {
            self.dump_cycles(succ, state);
        }
        state.path.pop();
        state.on_path.remove(&node);
    }

    /// Whether any directed cycle exists. Early-exit variant of the dump.
    pub fn has_cycle(&self) -> bool {
        let mut state = CycleState::default();
        self.source_nodes()
            .any(|start| self.find_cycle(start, &mut state))
    }

    fn find_cycle(&self, node: usize, state: &mut CycleState) -> bool {
        if state.on_path.contains(&node) {
            return true;
        }
        if state.visited.contains(&node) {
            return false;
        }
        state.on_path.insert(node);
        for succ in self.successors(node) {
            if self.find_cycle(succ, state) {
                return true;
            }
        }
        state.on_path.remove(&node);
        false
    }
}
