//! Basic statistics for a follow graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: sizes of the graph.
//! - **density**: ratio of actual to possible undirected edges,
//!   `2 * edge_count / (node_count * (node_count - 1))`. Zero for graphs
//!   with fewer than two nodes.
//! - **component_count**: connected components, isolated nodes included.
//! - **isolated_node_count**: nodes with degree zero.
//! - **max_degree** / **mean_degree**: degree extremes and average.
//! - **content_hash**: BLAKE3 hash of the node and edge sets.

use cohort_core::graph::FollowGraph;
use serde::Serialize;

/// Summary statistics for a [`FollowGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Between 0.0 (no edges) and 1.0 (complete graph).
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &FollowGraph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let degrees: Vec<usize> = graph.nodes().map(|id| graph.degree(id)).collect();
        let isolated_node_count = degrees.iter().filter(|&&d| d == 0).count();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count: graph.component_count(),
            isolated_node_count,
            max_degree,
            mean_degree: compute_mean_degree(node_count, edge_count),
            content_hash: graph.content_hash(),
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0_f64;
    }
    (2 * edge_count) as f64 / node_count as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let s = GraphStats::from_graph(&FollowGraph::new());
        assert_eq!(s.node_count, 0);
        assert_eq!(s.component_count, 0);
        assert!((s.density - 0.0).abs() < 1e-10);
        assert!((s.mean_degree - 0.0).abs() < 1e-10);
        assert!(s.is_flat());
    }

    #[test]
    fn complete_graph_has_density_one() {
        let g = FollowGraph::from_edges([
            ("a", "b"),
            ("a", "c"),
            ("a", "d"),
            ("b", "c"),
            ("b", "d"),
            ("c", "d"),
        ]);
        let s = GraphStats::from_graph(&g);
        assert!((s.density - 1.0).abs() < 1e-10);
        assert_eq!(s.max_degree, 3);
        assert!((s.mean_degree - 3.0).abs() < 1e-10);
        assert_eq!(s.component_count, 1);
    }

    #[test]
    fn isolated_nodes_counted() {
        let mut g = FollowGraph::from_edges([("a", "b")]);
        g.add_node("x");
        g.add_node("y");
        let s = GraphStats::from_graph(&g);
        assert_eq!(s.isolated_node_count, 2);
        assert_eq!(s.component_count, 3);
        // 1 edge out of 6 possible.
        assert!((s.density - 1.0 / 6.0).abs() < 1e-10);
        assert!(s.content_hash.starts_with("blake3:"));
    }
}
