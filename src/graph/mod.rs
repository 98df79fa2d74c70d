//! Contractible graph representation
//!
//! Provides an arena-based graph structure optimized for:
//! - O(1) node creation keyed by caller-supplied labels
//! - O(V + E) node contraction with self-loop removal
//! - Independent deep copies for repeated randomized trials
//! - Parallel arcs (semantically meaningful for minimum cut)
//!
//! Arcs are directed. An undirected graph is modeled as mirrored arc
//! pairs (`bidirectional = true` on insertion); [`Graph::edge_count`]
//! counts each mirrored pair once, which is the convention every cut
//! computation in this crate relies on.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Caller-supplied node identifier.
///
/// Blanket-implemented for any clonable, hashable, ordered type; in
/// practice integers or short strings.
pub trait Label: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Label for T {}

/// Opaque handle to a node in the arena.
///
/// Handles are invalidated by contraction: contracting `u` and `v`
/// tombstones both and allocates a fresh handle for the merged node.
/// The label map ([`Graph::resolve`]) always points at live handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index backing this handle
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node: the set of original labels merged into it, plus its
/// ordered outgoing adjacency. Singleton label set until contracted.
#[derive(Debug, Clone)]
struct Node<L: Label> {
    labels: BTreeSet<L>,
    adjacency: Vec<NodeId>,
}

/// Out-degree and size statistics for a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of live nodes
    pub num_nodes: usize,
    /// Total directed arc count
    pub num_arcs: usize,
    /// Undirected edge count (arc count / 2, for mirrored graphs)
    pub num_edges: usize,
    /// Minimum out-degree
    pub min_degree: usize,
    /// Maximum out-degree
    pub max_degree: usize,
    /// Average out-degree
    pub avg_degree: f64,
}

/// Mutable, contractible directed graph.
///
/// Nodes live in an arena (`Vec<Option<Node>>`); contraction tombstones
/// the two merged slots and appends the merged node, so handles are
/// never reused. A side map from every *original* label to its current
/// handle is maintained across contractions, which keeps label lookup
/// O(1) no matter how many merges a node has been through.
pub struct Graph<L: Label> {
    nodes: Vec<Option<Node<L>>>,
    alive: usize,
    handles: HashMap<L, NodeId>,
}

impl<L: Label> Graph<L> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            alive: 0,
            handles: HashMap::new(),
        }
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.alive
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Total directed arc count
    pub fn arc_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .map(|n| n.adjacency.len())
            .sum()
    }

    /// Undirected edge count: each mirrored arc pair counted once.
    ///
    /// Only meaningful for graphs built with `bidirectional = true`;
    /// for purely directed graphs use [`Graph::arc_count`].
    pub fn edge_count(&self) -> usize {
        self.arc_count() / 2
    }

    /// Register `label` if absent and return its handle
    pub fn add_node(&mut self, label: L) -> NodeId {
        if let Some(&id) = self.handles.get(&label) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            labels: BTreeSet::from([label.clone()]),
            adjacency: Vec::new(),
        }));
        self.handles.insert(label, id);
        self.alive += 1;
        id
    }

    /// Insert an arc `s -> t`, creating either node if absent.
    ///
    /// With `bidirectional` the mirror arc `t -> s` is added too.
    /// Duplicate arcs are allowed (parallel edges).
    pub fn add_edge(&mut self, s: L, t: L, bidirectional: bool) {
        let su = self.add_node(s);
        let tu = self.add_node(t);
        if let Some(n) = self.nodes[su.index()].as_mut() {
            n.adjacency.push(tu);
        }
        if bidirectional {
            if let Some(n) = self.nodes[tu.index()].as_mut() {
                n.adjacency.push(su);
            }
        }
    }

    /// Current handle for an original label, if it was ever registered
    pub fn resolve(&self, label: &L) -> Option<NodeId> {
        self.handles.get(label).copied()
    }

    /// Whether `id` refers to a live node
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(Option::is_some)
    }

    /// Iterate over the handles of all live nodes
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId(i)))
    }

    /// Original labels merged into node `id`
    pub fn labels_of(&self, id: NodeId) -> Option<&BTreeSet<L>> {
        self.node(id).map(|n| &n.labels)
    }

    /// Reporting label for node `id`: the minimum of its label set
    pub fn representative(&self, id: NodeId) -> Option<&L> {
        self.node(id).and_then(|n| n.labels.iter().next())
    }

    /// Outgoing adjacency of node `id`; empty for dead handles
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.adjacency.as_slice())
    }

    /// Out-degree of node `id`
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    fn node(&self, id: NodeId) -> Option<&Node<L>> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Contract the nodes currently holding `u` and `v`.
    ///
    /// Fails with [`GraphError::UnknownNode`] if either label was never
    /// registered, and [`GraphError::InvalidContraction`] if both
    /// resolve to the same node. See [`Graph::contract_nodes`] for the
    /// merge semantics.
    pub fn contract(&mut self, u: &L, v: &L) -> Result<NodeId> {
        let hu = self
            .resolve(u)
            .ok_or_else(|| GraphError::UnknownNode(format!("{u:?}")))?;
        let hv = self
            .resolve(v)
            .ok_or_else(|| GraphError::UnknownNode(format!("{v:?}")))?;
        if hu == hv {
            return Err(GraphError::InvalidContraction(format!(
                "{u:?} and {v:?} resolve to the same node"
            )));
        }
        self.contract_nodes(hu, hv)
    }

    /// Contract two live nodes by handle, returning the merged handle.
    ///
    /// The merged node owns the union of both label sets and the
    /// concatenation of both adjacency lists minus any arc into `u` or
    /// `v` (self-loops created by the merge are dropped; parallel arcs
    /// into third nodes are preserved). Every other node's adjacency is
    /// rewritten to point at the merged handle. O(V + E).
    pub fn contract_nodes(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        if u == v {
            return Err(GraphError::InvalidContraction(format!(
                "node {u:?} with itself"
            )));
        }
        let un = match self.nodes.get_mut(u.index()).and_then(Option::take) {
            Some(n) => n,
            None => {
                return Err(GraphError::InvalidContraction(format!(
                    "stale handle {u:?}"
                )))
            }
        };
        let vn = match self.nodes.get_mut(v.index()).and_then(Option::take) {
            Some(n) => n,
            None => {
                // Put u back before surfacing the error.
                self.nodes[u.index()] = Some(un);
                return Err(GraphError::InvalidContraction(format!(
                    "stale handle {v:?}"
                )));
            }
        };

        let merged = NodeId(self.nodes.len());

        let mut labels = un.labels;
        labels.extend(vn.labels);
        for label in &labels {
            self.handles.insert(label.clone(), merged);
        }

        let adjacency: Vec<NodeId> = un
            .adjacency
            .iter()
            .chain(vn.adjacency.iter())
            .copied()
            .filter(|&d| d != u && d != v)
            .collect();

        self.nodes.push(Some(Node { labels, adjacency }));

        // Repoint every surviving arc into u or v at the merged node.
        for slot in &mut self.nodes {
            if let Some(n) = slot {
                for dest in &mut n.adjacency {
                    if *dest == u || *dest == v {
                        *dest = merged;
                    }
                }
            }
        }

        self.alive -= 1;
        Ok(merged)
    }

    /// Pick an arc uniformly in two stages: a node uniformly among live
    /// nodes, then a destination uniformly among its out-arcs.
    ///
    /// Fails with [`GraphError::EmptyGraph`] when the graph has no
    /// nodes, or no arcs at all. A node with out-degree zero is
    /// resampled; contraction keeps every node of a connected graph at
    /// degree >= 1 by dropping self-loops, so resampling terminates.
    pub fn pick_random_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(NodeId, NodeId)> {
        if self.alive == 0 || self.arc_count() == 0 {
            return Err(GraphError::EmptyGraph);
        }
        let live: Vec<NodeId> = self.nodes().collect();
        loop {
            let u = live[rng.gen_range(0..live.len())];
            let adjacency = self.neighbors(u);
            if !adjacency.is_empty() {
                let v = adjacency[rng.gen_range(0..adjacency.len())];
                return Ok((u, v));
            }
        }
    }

    /// Compute size and degree statistics
    pub fn stats(&self) -> GraphStats {
        if self.alive == 0 {
            return GraphStats::default();
        }
        let degrees: Vec<usize> = self
            .nodes
            .iter()
            .flatten()
            .map(|n| n.adjacency.len())
            .collect();
        let num_arcs: usize = degrees.iter().sum();
        GraphStats {
            num_nodes: self.alive,
            num_arcs,
            num_edges: num_arcs / 2,
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            avg_degree: num_arcs as f64 / self.alive as f64,
        }
    }
}

impl<L: Label> Default for Graph<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: a fully independent graph with a compacted arena.
///
/// Tombstoned slots are dropped and handles renumbered, so repeated
/// clone-and-contract cycles do not grow the arena without bound.
impl<L: Label> Clone for Graph<L> {
    fn clone(&self) -> Self {
        let mut remap = vec![usize::MAX; self.nodes.len()];
        let mut next = 0usize;
        for (i, slot) in self.nodes.iter().enumerate() {
            if slot.is_some() {
                remap[i] = next;
                next += 1;
            }
        }
        let nodes: Vec<Option<Node<L>>> = self
            .nodes
            .iter()
            .flatten()
            .map(|n| {
                Some(Node {
                    labels: n.labels.clone(),
                    adjacency: n.adjacency.iter().map(|d| NodeId(remap[d.index()])).collect(),
                })
            })
            .collect();
        let handles = self
            .handles
            .iter()
            .map(|(l, id)| (l.clone(), NodeId(remap[id.index()])))
            .collect();
        Self {
            nodes,
            alive: next,
            handles,
        }
    }
}

impl<L: Label> fmt::Debug for Graph<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for id in self.nodes() {
            let dests: Vec<&BTreeSet<L>> = self
                .neighbors(id)
                .iter()
                .filter_map(|&d| self.labels_of(d))
                .collect();
            map.entry(&self.labels_of(id), &dests);
        }
        map.finish()
    }
}

/// Build a graph from an edge list.
///
/// With `bidirectional` every pair produces mirrored arcs (undirected
/// semantics, required by min-cut); without it the graph is directed
/// (required by SCC).
pub fn build_graph<L, I>(edges: I, bidirectional: bool) -> Graph<L>
where
    L: Label,
    I: IntoIterator<Item = (L, L)>,
{
    let mut g = Graph::new();
    for (s, t) in edges {
        g.add_edge(s, t, bidirectional);
    }
    g
}
