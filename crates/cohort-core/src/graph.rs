//! Undirected follow graph.
//!
//! # Overview
//!
//! [`FollowGraph`] is the substrate every other part of cohort works on:
//! users and followed accounts are nodes (opaque string identifiers), and an
//! undirected edge joins a user to each account they follow.
//!
//! The graph is a [`petgraph`] `StableUnGraph` paired with a `BTreeMap` from
//! identifier to `NodeIndex`. The stable graph keeps node indices valid while
//! edges are removed during partitioning; the ordered map gives every
//! traversal a deterministic, identifier-sorted node order.
//!
//! ## Canonical Edges
//!
//! Undirected edges are reported as [`Edge`] values whose endpoints are
//! ordered by identifier, so `(a, b)` always has `a < b` and each edge has
//! exactly one representation.
//!
//! ## Invariants
//!
//! - no self-loops (`add_edge(x, x)` is a no-op)
//! - no duplicate edges
//! - an edge implies both endpoints exist as nodes

#![allow(clippy::module_name_repetitions)]

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use fixedbitset::FixedBitSet;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An undirected edge in canonical form: the smaller identifier comes first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Edge(String, String);

impl Edge {
    /// Build the canonical edge between `x` and `y`, in either order.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y { Self(x, y) } else { Self(y, x) }
    }

    /// The endpoint that sorts first.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0
    }

    /// The endpoint that sorts second.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.1
    }

    /// Return `true` if `node` is one of the two endpoints.
    #[must_use]
    pub fn touches(&self, node: &str) -> bool {
        self.0 == node || self.1 == node
    }
}

impl From<(String, String)> for Edge {
    fn from((x, y): (String, String)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

// ---------------------------------------------------------------------------
// FollowGraph
// ---------------------------------------------------------------------------

/// An undirected graph of string-identified nodes.
///
/// Cloning is cheap relative to any analysis run on the graph; the
/// partitioner clones once and edits its private copy.
#[derive(Debug, Clone, Default)]
pub struct FollowGraph {
    graph: StableUnGraph<String, ()>,
    node_map: BTreeMap<String, NodeIndex>,
}

impl FollowGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list. Endpoints are added as nodes.
    #[must_use]
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Add a node, returning its index. Adding an existing node is a no-op
    /// that returns the existing index.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.node_map.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_map.insert(id, idx);
        idx
    }

    /// Add an undirected edge, creating missing endpoints.
    ///
    /// Returns `true` if a new edge was inserted. Self-loops and duplicate
    /// edges are ignored and return `false`.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        if self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    /// Remove the edge between `a` and `b`. Returns `true` if it existed.
    pub fn remove_edge(&mut self, a: &str, b: &str) -> bool {
        let (Some(ia), Some(ib)) = (self.node_index(a), self.node_index(b)) else {
            return false;
        };
        self.graph
            .find_edge(ia, ib)
            .and_then(|e| self.graph.remove_edge(e))
            .is_some()
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_map.len()
    }

    /// Return the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    #[must_use]
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Look up the `NodeIndex` for an identifier.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the identifier of a node.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Upper bound on `NodeIndex::index()` values, for sizing dense
    /// index-addressed buffers.
    #[must_use]
    pub fn node_bound(&self) -> usize {
        self.graph.node_indices().map(|i| i.index() + 1).max().unwrap_or(0)
    }

    /// Iterate node identifiers in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.node_map.keys().map(String::as_str)
    }

    /// Iterate node indices in ascending identifier order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node_map.values().copied()
    }

    /// Iterate the neighbors of a node by index, in unspecified order.
    pub fn neighbor_indices(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Neighbors of `id`, sorted by identifier. Empty for unknown nodes.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .filter_map(|n| self.node_id(n))
            .collect();
        out.sort_unstable();
        out
    }

    /// Degree of `id`; zero for unknown nodes.
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.node_index(id)
            .map_or(0, |idx| self.graph.neighbors(idx).count())
    }

    /// All edges in canonical form, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter_map(|(a, b)| Some(Edge::new(self.node_id(a)?, self.node_id(b)?)))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Order two node indices by their identifiers.
    ///
    /// Used by index-level algorithms to key per-edge maps canonically
    /// without allocating [`Edge`] values.
    #[must_use]
    pub fn canonical_pair(&self, a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
        match self.node_id(a).cmp(&self.node_id(b)) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        }
    }

    /// Turn an index pair into a canonical [`Edge`].
    #[must_use]
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<Edge> {
        Some(Edge::new(self.node_id(a)?, self.node_id(b)?))
    }

    // -----------------------------------------------------------------------
    // Connectivity
    // -----------------------------------------------------------------------

    /// Enumerate connected components as sorted identifier lists.
    ///
    /// Components are ordered by their smallest member. Isolated nodes form
    /// singleton components.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<&str>> {
        self.component_indices()
            .into_iter()
            .map(|members| {
                let mut ids: Vec<&str> = members.iter().filter_map(|&i| self.node_id(i)).collect();
                ids.sort_unstable();
                ids
            })
            .collect()
    }

    /// Number of connected components (isolated nodes included).
    #[must_use]
    pub fn component_count(&self) -> usize {
        let mut seen = FixedBitSet::with_capacity(self.node_bound());
        let mut count = 0;
        for start in self.node_indices() {
            if seen.contains(start.index()) {
                continue;
            }
            count += 1;
            self.flood(start, &mut seen, |_| {});
        }
        count
    }

    /// One node-induced subgraph per connected component, in the order of
    /// [`connected_components`](Self::connected_components).
    #[must_use]
    pub fn component_subgraphs(&self) -> Vec<Self> {
        self.connected_components()
            .into_iter()
            .map(|members| self.induced_subgraph(members))
            .collect()
    }

    /// The subgraph induced by `nodes`: those nodes plus every edge whose
    /// endpoints are both in the set. Unknown identifiers are skipped.
    #[must_use]
    pub fn induced_subgraph<'a>(&self, nodes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sub = Self::new();
        for id in nodes {
            if self.contains_node(id) {
                sub.add_node(id);
            }
        }
        for edge in self.edges() {
            if sub.contains_node(edge.first()) && sub.contains_node(edge.second()) {
                sub.add_edge(edge.first(), edge.second());
            }
        }
        sub
    }

    /// BLAKE3 hash over the sorted node list and canonical edge list.
    ///
    /// Two graphs with the same nodes and edges hash identically regardless
    /// of insertion order.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for id in self.nodes() {
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for edge in self.edges() {
            hasher.update(edge.first().as_bytes());
            hasher.update(b"\x00");
            hasher.update(edge.second().as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    fn component_indices(&self) -> Vec<Vec<NodeIndex>> {
        let mut seen = FixedBitSet::with_capacity(self.node_bound());
        let mut components = Vec::new();
        for start in self.node_indices() {
            if seen.contains(start.index()) {
                continue;
            }
            let mut members = Vec::new();
            self.flood(start, &mut seen, |idx| members.push(idx));
            components.push(members);
        }
        components
    }

    /// Breadth-first flood fill from `start`, marking `seen` and reporting
    /// every newly reached node (including `start`) to `visit`.
    fn flood(&self, start: NodeIndex, seen: &mut FixedBitSet, mut visit: impl FnMut(NodeIndex)) {
        let mut queue = VecDeque::from([start]);
        seen.insert(start.index());
        while let Some(current) = queue.pop_front() {
            visit(current);
            for next in self.graph.neighbors(current) {
                if !seen.put(next.index()) {
                    queue.push_back(next);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
