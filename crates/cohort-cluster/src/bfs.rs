//! Depth-bounded breadth-first search trees with shortest-path counting.
//!
//! # Overview
//!
//! A [`BfsTree`] records, for one root, every node reachable within
//! `max_depth` hops together with:
//!
//! - its distance from the root,
//! - the number of distinct shortest paths from the root to it,
//! - the set of its parents: neighbors exactly one hop closer to the root.
//!
//! # Multiple Parents
//!
//! In an undirected graph a node is often reached by several shortest paths
//! of equal length. Each such path contributes a parent, and the node's path
//! count is the sum of its parents' path counts:
//!
//! ```text
//!     A          distance(D) = 2
//!    / \         parents(D)  = {B, C}
//!   B   C        paths(D)    = paths(B) + paths(C) = 2
//!    \ /
//!     D
//! ```
//!
//! A single-parent BFS would record `paths(D) = 1` and the credit
//! accumulator would then push all of D's credit through one edge.
//!
//! # Layer Order
//!
//! Nodes are dequeued strictly by distance, so when a node is dequeued its
//! path count is final: every parent sits in the previous layer and has
//! already been processed.

use std::collections::{HashMap, VecDeque};

use cohort_core::graph::FollowGraph;
use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use crate::error::ClusterError;

/// Convert a signed depth (as written in configuration or on the command
/// line) to a BFS bound. Negative depths mean "root only".
#[must_use]
pub fn clamp_depth(raw: i64) -> usize {
    usize::try_from(raw).unwrap_or(0)
}

/// Shortest-path structure rooted at one node.
#[derive(Debug, Clone)]
pub struct BfsTree<'g> {
    pub(crate) graph: &'g FollowGraph,
    pub(crate) root: NodeIndex,
    max_depth: usize,
    /// Visited nodes in dequeue order (non-decreasing distance).
    pub(crate) order: Vec<NodeIndex>,
    pub(crate) distance: HashMap<NodeIndex, usize>,
    pub(crate) path_count: HashMap<NodeIndex, u64>,
    pub(crate) parents: HashMap<NodeIndex, Vec<NodeIndex>>,
}

/// Build the BFS tree for `root`, visiting nodes at most `max_depth` hops
/// away.
///
/// # Errors
///
/// Returns [`ClusterError::InvalidRoot`] if `root` is not in `graph`.
pub fn build_bfs_tree<'g>(
    graph: &'g FollowGraph,
    root: &str,
    max_depth: usize,
) -> Result<BfsTree<'g>, ClusterError> {
    let idx = graph
        .node_index(root)
        .ok_or_else(|| ClusterError::InvalidRoot(root.to_string()))?;
    Ok(BfsTree::grow(graph, idx, max_depth))
}

impl<'g> BfsTree<'g> {
    /// Run the search from a root already known to be in the graph.
    pub(crate) fn grow(graph: &'g FollowGraph, root: NodeIndex, max_depth: usize) -> Self {
        let mut distance: HashMap<NodeIndex, usize> = HashMap::new();
        let mut path_count: HashMap<NodeIndex, u64> = HashMap::new();
        let mut parents: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut order: Vec<NodeIndex> = Vec::new();

        distance.insert(root, 0);
        path_count.insert(root, 1);
        parents.insert(root, Vec::new());

        let mut queue: VecDeque<NodeIndex> = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            order.push(current);

            let d = distance[&current];
            if d >= max_depth {
                continue;
            }
            let paths_here = path_count[&current];

            for next in graph.neighbor_indices(current) {
                match distance.get(&next) {
                    // First visit.
                    None => {
                        distance.insert(next, d + 1);
                        path_count.insert(next, paths_here);
                        parents.insert(next, vec![current]);
                        queue.push_back(next);
                    }
                    // Another shortest path of equal length.
                    Some(&dn) if dn == d + 1 => {
                        if let Some(count) = path_count.get_mut(&next) {
                            *count = count.saturating_add(paths_here);
                        }
                        if let Some(ps) = parents.get_mut(&next) {
                            ps.push(current);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        Self {
            graph,
            root,
            max_depth,
            order,
            distance,
            path_count,
            parents,
        }
    }

    /// The root identifier.
    #[must_use]
    pub fn root(&self) -> &str {
        self.graph.node_id(self.root).unwrap_or_default()
    }

    /// The depth bound this tree was built with.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of visited nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`: the root is always visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.graph
            .node_index(id)
            .is_some_and(|idx| self.distance.contains_key(&idx))
    }

    /// Hop distance from the root, or `None` if not reached.
    #[must_use]
    pub fn distance(&self, id: &str) -> Option<usize> {
        self.distance.get(&self.graph.node_index(id)?).copied()
    }

    /// Number of shortest paths from the root, or `None` if not reached.
    #[must_use]
    pub fn path_count(&self, id: &str) -> Option<u64> {
        self.path_count.get(&self.graph.node_index(id)?).copied()
    }

    /// Parents of `id`, sorted by identifier. Empty for the root; `None` if
    /// not reached.
    #[must_use]
    pub fn parents(&self, id: &str) -> Option<Vec<&'g str>> {
        let ps = self.parents.get(&self.graph.node_index(id)?)?;
        Some(self.sorted_ids(ps))
    }

    /// Visited identifiers in BFS order.
    pub fn nodes(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.order.iter().filter_map(|&idx| self.graph.node_id(idx))
    }

    /// One row per visited node, ordered by distance then identifier.
    #[must_use]
    pub fn entries(&self) -> Vec<BfsEntry<'g>> {
        let mut rows: Vec<BfsEntry<'g>> = self
            .order
            .iter()
            .filter_map(|&idx| {
                Some(BfsEntry {
                    node: self.graph.node_id(idx)?,
                    distance: self.distance[&idx],
                    path_count: self.path_count[&idx],
                    parents: self.sorted_ids(&self.parents[&idx]),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.node.cmp(b.node)));
        rows
    }

    fn sorted_ids(&self, indices: &[NodeIndex]) -> Vec<&'g str> {
        let mut ids: Vec<&'g str> = indices
            .iter()
            .filter_map(|&i| self.graph.node_id(i))
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// A visited node with its distance, path count, and parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BfsEntry<'g> {
    pub node: &'g str,
    pub distance: usize,
    pub path_count: u64,
    pub parents: Vec<&'g str>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// The eight-node graph used throughout: two routes from A to E and a
    /// tail beyond E.
    ///
    /// ```text
    ///   A - B - D - E - G
    ///   |       |   |
    ///   C ----- F   H
    /// ```
    fn sample() -> FollowGraph {
        FollowGraph::from_edges([
            ("A", "B"),
            ("A", "C"),
            ("B", "D"),
            ("C", "F"),
            ("D", "E"),
            ("D", "F"),
            ("E", "G"),
            ("E", "H"),
        ])
    }

    fn diamond() -> FollowGraph {
        FollowGraph::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")])
    }

    #[test]
    fn unknown_root_is_rejected() {
        let g = sample();
        let err = build_bfs_tree(&g, "Z", 3).unwrap_err();
        assert_eq!(err, ClusterError::InvalidRoot("Z".into()));
    }

    #[test]
    fn clamp_depth_maps_negative_to_zero() {
        assert_eq!(clamp_depth(-5), 0);
        assert_eq!(clamp_depth(0), 0);
        assert_eq!(clamp_depth(7), 7);
    }

    #[test]
    fn depth_zero_visits_root_only() {
        let g = sample();
        let tree = build_bfs_tree(&g, "A", 0).expect("tree");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.distance("A"), Some(0));
        assert_eq!(tree.path_count("A"), Some(1));
        assert_eq!(tree.parents("A"), Some(vec![]));
        assert!(!tree.contains("B"));
    }

    #[test]
    fn diamond_records_both_parents() {
        let g = diamond();
        let tree = build_bfs_tree(&g, "A", 5).expect("tree");
        assert_eq!(tree.distance("D"), Some(2));
        assert_eq!(tree.parents("D"), Some(vec!["B", "C"]));
        assert_eq!(tree.path_count("D"), Some(2));
    }

    #[test]
    fn sample_distances_counts_and_parents() {
        let g = sample();
        let tree = build_bfs_tree(&g, "E", 5).expect("tree");

        let expected: [(&str, usize, u64, &[&str]); 8] = [
            ("E", 0, 1, &[]),
            ("D", 1, 1, &["E"]),
            ("G", 1, 1, &["E"]),
            ("H", 1, 1, &["E"]),
            ("B", 2, 1, &["D"]),
            ("F", 2, 1, &["D"]),
            ("A", 3, 1, &["B"]),
            ("C", 3, 1, &["F"]),
        ];
        for (node, dist, paths, parents) in expected {
            assert_eq!(tree.distance(node), Some(dist), "distance of {node}");
            assert_eq!(tree.path_count(node), Some(paths), "paths of {node}");
            assert_eq!(tree.parents(node), Some(parents.to_vec()), "parents of {node}");
        }
    }

    #[test]
    fn fan_in_reached_through_already_dequeued_layer() {
        // From A: D has parents B and C, F has parent C only, and E is
        // reached via D (2 paths).
        let g = sample();
        let tree = build_bfs_tree(&g, "A", 5).expect("tree");
        assert_eq!(tree.path_count("D"), Some(1));
        assert_eq!(tree.path_count("F"), Some(1));
        assert_eq!(tree.distance("E"), Some(3));
        assert_eq!(tree.parents("E"), Some(vec!["D"]));

        let g2 = FollowGraph::from_edges([
            ("r", "a"),
            ("r", "b"),
            ("r", "c"),
            ("a", "x"),
            ("b", "x"),
            ("c", "x"),
            ("x", "y"),
        ]);
        let tree2 = build_bfs_tree(&g2, "r", 5).expect("tree");
        assert_eq!(tree2.path_count("x"), Some(3));
        assert_eq!(tree2.path_count("y"), Some(3), "inherits all of x's paths");
    }

    #[test]
    fn depth_bound_excludes_far_nodes() {
        let g = sample();
        let tree = build_bfs_tree(&g, "E", 2).expect("tree");
        assert!(tree.contains("B"));
        assert!(tree.contains("F"));
        assert!(!tree.contains("A"));
        assert!(!tree.contains("C"));
        assert_eq!(tree.distance("A"), None);
        assert_eq!(tree.path_count("C"), None);
        assert_eq!(tree.parents("A"), None);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn path_count_is_sum_over_parents() {
        let g = FollowGraph::from_edges([
            ("a", "b"),
            ("a", "c"),
            ("a", "d"),
            ("b", "e"),
            ("c", "e"),
            ("c", "f"),
            ("d", "f"),
            ("e", "g"),
            ("f", "g"),
        ]);
        for root in ["a", "g", "c"] {
            let tree = build_bfs_tree(&g, root, 10).expect("tree");
            for node in tree.nodes() {
                if node == root {
                    continue;
                }
                let sum: u64 = tree
                    .parents(node)
                    .expect("visited")
                    .iter()
                    .map(|p| tree.path_count(p).expect("parent visited"))
                    .sum();
                assert_eq!(tree.path_count(node), Some(sum), "{root} -> {node}");
            }
        }
    }

    #[test]
    fn bfs_order_is_layered() {
        let g = sample();
        let tree = build_bfs_tree(&g, "A", 10).expect("tree");
        let dists: Vec<usize> = tree
            .nodes()
            .map(|n| tree.distance(n).expect("visited"))
            .collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]), "{dists:?}");
    }

    #[test]
    fn entries_sorted_by_distance_then_id() {
        let g = diamond();
        let tree = build_bfs_tree(&g, "A", 2).expect("tree");
        let rows = tree.entries();
        let nodes: Vec<&str> = rows.iter().map(|r| r.node).collect();
        assert_eq!(nodes, vec!["A", "B", "C", "D"]);
        assert_eq!(rows[3].parents, vec!["B", "C"]);
        assert_eq!(tree.root(), "A");
        assert_eq!(tree.max_depth(), 2);
    }
}
