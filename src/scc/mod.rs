//! Strongly connected components via Kosaraju's two-pass algorithm
//!
//! Pass 1 runs a depth-first traversal over the reverse graph and
//! records the order in which the traversal backtracks out of each
//! node (the finish order). Pass 2 runs the same traversal over the
//! forward graph, seeding roots in decreasing finish order; every node
//! claimed by a fresh root belongs to that root's component and the
//! root is the component's leader.
//!
//! Both passes use an explicit stack rather than native recursion, so
//! traversal depth is bounded by heap capacity instead of the call
//! stack. Parallel arcs are deduplicated once, up front, when the
//! dense forward index and its reverse are built; a multi-arc must not
//! be walked twice or double-counted in visited-state bookkeeping.
//!
//! O(V + E) overall.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::{Graph, Label, NodeId};

/// Partition of a directed graph into strongly connected components,
/// keyed by each component's leader label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccResult<L: Label> {
    components: HashMap<L, BTreeSet<L>>,
}

impl<L: Label> SccResult<L> {
    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the graph had no nodes
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Leader label -> member label set
    pub fn components(&self) -> &HashMap<L, BTreeSet<L>> {
        &self.components
    }

    /// The component containing `label`, if any
    pub fn component_of(&self, label: &L) -> Option<&BTreeSet<L>> {
        self.components.values().find(|members| members.contains(label))
    }

    /// Whether two labels ended up in the same component
    pub fn same_component(&self, a: &L, b: &L) -> bool {
        self.component_of(a)
            .is_some_and(|members| members.contains(b))
    }

    /// Component sizes in decreasing order
    pub fn component_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.components.values().map(BTreeSet::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    /// Consume the result, yielding the leader -> members map
    pub fn into_components(self) -> HashMap<L, BTreeSet<L>> {
        self.components
    }
}

/// Compute the strongly connected components of `g`.
///
/// The graph is treated as read-only; arcs are walked in their
/// insertion direction, so a graph built with `bidirectional = true`
/// trivially collapses each connected component into one SCC. Every
/// node appears in exactly one returned component.
pub fn find_scc<L: Label>(g: &Graph<L>) -> SccResult<L> {
    let ids: Vec<NodeId> = g.nodes().collect();
    let n = ids.len();
    let index_of: HashMap<NodeId, usize> =
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // Dedup parallel arcs once, before either pass; the reverse index
    // inherits the dedup from the forward one.
    let mut forward: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, &id) in ids.iter().enumerate() {
        let mut seen = HashSet::new();
        for dest in g.neighbors(id) {
            let j = index_of[dest];
            if seen.insert(j) {
                forward[i].push(j);
                reverse[j].push(i);
            }
        }
    }

    // Pass 1: finish order on the reverse graph.
    let mut explored = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    for root in 0..n {
        if !explored[root] {
            dfs_finish(&reverse, root, &mut explored, &mut order);
        }
    }

    // Pass 2: claim components on the forward graph in decreasing
    // finish order; each fresh root is its component's leader.
    explored.fill(false);
    let mut components = HashMap::new();
    for &root in order.iter().rev() {
        if explored[root] {
            continue;
        }
        let mut members = BTreeSet::new();
        dfs_collect(&forward, root, &mut explored, |node| {
            if let Some(labels) = g.labels_of(ids[node]) {
                members.extend(labels.iter().cloned());
            }
        });
        if let Some(leader) = g.representative(ids[root]) {
            components.insert(leader.clone(), members);
        }
    }

    SccResult { components }
}

/// Explicit-stack DFS recording finish order.
///
/// Protocol: push `(node, false)`; a node popped with the marker unset
/// is marked explored, re-pushed with the marker set, and its
/// unexplored neighbors are pushed unset; a node popped with the
/// marker set is appended to the finish order. Nodes already explored
/// when popped unset are skipped, so duplicate stack entries (possible
/// when several neighbors share a successor) finish exactly once.
fn dfs_finish(adj: &[Vec<usize>], root: usize, explored: &mut [bool], order: &mut Vec<usize>) {
    let mut stack: Vec<(usize, bool)> = vec![(root, false)];
    while let Some((node, finished)) = stack.pop() {
        if finished {
            order.push(node);
            continue;
        }
        if explored[node] {
            continue;
        }
        explored[node] = true;
        stack.push((node, true));
        for &next in &adj[node] {
            if !explored[next] {
                stack.push((next, false));
            }
        }
    }
}

/// Explicit-stack DFS invoking `visit` on each newly claimed node.
fn dfs_collect<F: FnMut(usize)>(
    adj: &[Vec<usize>],
    root: usize,
    explored: &mut [bool],
    mut visit: F,
) {
    let mut stack = vec![root];
    explored[root] = true;
    visit(root);
    while let Some(node) = stack.pop() {
        for &next in &adj[node] {
            if !explored[next] {
                explored[next] = true;
                visit(next);
                stack.push(next);
            }
        }
    }
}
