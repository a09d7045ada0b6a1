//! Bottom-up credit accumulation over one BFS tree.
//!
//! # Algorithm
//!
//! This is the dependency-accumulation step of Brandes' algorithm, phrased
//! the Girvan-Newman way:
//!
//! 1. Every visited node starts with one unit of credit.
//! 2. Nodes are processed farthest-first. A node `v` splits its credit among
//!    its parents in proportion to their share of `v`'s shortest paths:
//!    parent `p` receives `credit(v) * paths(p) / paths(v)`.
//! 3. The amount passed from `v` to `p` is also the credit of the tree edge
//!    `(p, v)`.
//!
//! When `v` is processed its credit is final, because all of its children
//! are farther from the root and were processed first.
//!
//! # Determinism
//!
//! Ties in distance are broken by ascending node identifier and parents are
//! visited in identifier order, so the floating-point summation order is the
//! same on every run.

use std::collections::HashMap;

use cohort_core::graph::{Edge, FollowGraph};
use petgraph::stable_graph::NodeIndex;

use crate::bfs::BfsTree;

/// Index-level canonical edge key: endpoints ordered by identifier.
pub(crate) type EdgeKey = (NodeIndex, NodeIndex);

/// Credit contributed by one root's BFS tree to each tree edge.
#[derive(Debug, Clone)]
pub struct EdgeCredit<'g> {
    graph: &'g FollowGraph,
    pub(crate) credits: HashMap<EdgeKey, f64>,
}

impl EdgeCredit<'_> {
    /// Credit on the edge between `a` and `b`, in either order.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let key = self
            .graph
            .canonical_pair(self.graph.node_index(a)?, self.graph.node_index(b)?);
        self.credits.get(&key).copied()
    }

    /// Number of credited edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    /// Credited edges with their values, sorted by edge.
    #[must_use]
    pub fn to_sorted(&self) -> Vec<(Edge, f64)> {
        let mut out: Vec<(Edge, f64)> = self
            .credits
            .iter()
            .filter_map(|(&(a, b), &credit)| Some((self.graph.edge_between(a, b)?, credit)))
            .collect();
        out.sort_by(|x, y| x.0.cmp(&y.0));
        out
    }
}

/// Accumulate edge credit bottom-up over `tree`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn accumulate_credit<'g>(tree: &BfsTree<'g>) -> EdgeCredit<'g> {
    let graph = tree.graph;

    let mut schedule: Vec<(usize, &str, NodeIndex)> = tree
        .order
        .iter()
        .filter(|&&idx| idx != tree.root)
        .filter_map(|&idx| Some((tree.distance[&idx], graph.node_id(idx)?, idx)))
        .collect();
    schedule.sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    let mut node_credit: HashMap<NodeIndex, f64> =
        tree.order.iter().map(|&idx| (idx, 1.0)).collect();
    let mut credits: HashMap<EdgeKey, f64> = HashMap::with_capacity(tree.order.len());

    for (_, _, v) in schedule {
        let credit_v = node_credit[&v];
        let paths_v = tree.path_count[&v] as f64;

        let mut parents: Vec<(&str, NodeIndex)> = tree.parents[&v]
            .iter()
            .filter_map(|&p| Some((graph.node_id(p)?, p)))
            .collect();
        parents.sort_unstable_by(|a, b| a.0.cmp(b.0));

        for (_, p) in parents {
            let share = credit_v * (tree.path_count[&p] as f64 / paths_v);
            *node_credit.entry(p).or_insert(1.0) += share;
            *credits.entry(graph.canonical_pair(p, v)).or_insert(0.0) += share;
        }
    }

    EdgeCredit { graph, credits }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
