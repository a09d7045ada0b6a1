//! Approximate Girvan-Newman partitioning.
//!
//! # Algorithm
//!
//! 1. Compute edge betweenness **once**, on the original graph.
//! 2. Rank edges by descending betweenness (ties: ascending canonical edge).
//! 3. Clone the graph and remove ranked edges one at a time, recounting
//!    connected components after each removal, until the count reaches the
//!    target.
//!
//! Betweenness is deliberately not recomputed after each removal. Exact
//! Girvan-Newman would do so at a cost of one full betweenness pass per
//! removed edge; this variant trades that exactness for a single pass.
//!
//! # Stopping Rule
//!
//! The component count is checked before every removal, so a graph that
//! already has at least `target_components` components loses no edges.
//! Singleton components count toward the target but are dropped from the
//! returned component list.
//!
//! # Failure
//!
//! If every ranked edge has been removed and the count is still below the
//! target, the call fails with
//! [`ClusterError::UnreachableTargetComponents`] and returns nothing else.

use cohort_core::graph::FollowGraph;
use tracing::{debug, info, instrument};

use crate::betweenness::{Betweenness, BetweennessConfig, ScoredEdge, edge_betweenness_with};
use crate::error::ClusterError;

/// Settings for [`partition_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    pub max_depth: usize,
    pub target_components: usize,
    pub parallel: bool,
}

impl PartitionConfig {
    #[must_use]
    pub const fn new(max_depth: usize, target_components: usize) -> Self {
        Self {
            max_depth,
            target_components,
            parallel: false,
        }
    }
}

/// The outcome of a successful partition.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Non-singleton components of the working graph, ordered by smallest
    /// member identifier.
    pub components: Vec<FollowGraph>,
    /// The input graph with `removed` edges taken out.
    pub working: FollowGraph,
    /// Removed edges in removal order, with their betweenness.
    pub removed: Vec<ScoredEdge>,
    /// Betweenness of the original graph.
    pub betweenness: Betweenness,
    /// Component count of `working`, singletons included.
    pub component_count: usize,
}

/// Partition `graph` into at least `target_components` connected
/// components. Runs sequentially.
///
/// # Errors
///
/// See [`partition_with`].
pub fn partition(
    graph: &FollowGraph,
    max_depth: usize,
    target_components: usize,
) -> Result<Partition, ClusterError> {
    partition_with(graph, &PartitionConfig::new(max_depth, target_components))
}

/// Partition with explicit settings.
///
/// # Errors
///
/// - [`ClusterError::InvalidTarget`] if `target_components` is zero.
/// - [`ClusterError::UnreachableTargetComponents`] if removing every edge
///   still leaves fewer components than requested.
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn partition_with(
    graph: &FollowGraph,
    config: &PartitionConfig,
) -> Result<Partition, ClusterError> {
    let target = config.target_components;
    if target == 0 {
        return Err(ClusterError::InvalidTarget);
    }

    let betweenness = edge_betweenness_with(
        graph,
        &BetweennessConfig {
            max_depth: config.max_depth,
            parallel: config.parallel,
        },
    );

    let mut working = graph.clone();
    let mut count = working.component_count();
    let mut removed: Vec<ScoredEdge> = Vec::new();
    let mut order = betweenness.ranked().into_iter();

    while count < target {
        let Some(next) = order.next() else {
            return Err(ClusterError::UnreachableTargetComponents {
                target,
                reached: count,
            });
        };
        working.remove_edge(next.edge.first(), next.edge.second());
        count = working.component_count();
        debug!(edge = %next.edge, score = next.score, components = count, "removed edge");
        removed.push(next);
    }

    let components: Vec<FollowGraph> = working
        .component_subgraphs()
        .into_iter()
        .filter(|c| c.node_count() > 1)
        .collect();

    info!(
        removed = removed.len(),
        components = count,
        kept = components.len(),
        "partition complete"
    );

    Ok(Partition {
        components,
        working,
        removed,
        betweenness,
        component_count: count,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::graph::Edge;

    /// Two triangles joined by a single bridge (c, d).
    fn barbell() -> FollowGraph {
        FollowGraph::from_edges([
            ("a", "b"),
            ("a", "c"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("d", "f"),
            ("e", "f"),
        ])
    }

    #[test]
    fn zero_target_is_rejected() {
        let err = partition(&barbell(), 3, 0).unwrap_err();
        assert_eq!(err, ClusterError::InvalidTarget);
    }

    #[test]
    fn bridge_is_removed_first() {
        let g = barbell();
        let p = partition(&g, 5, 2).expect("partition");

        assert_eq!(p.removed.len(), 1);
        assert_eq!(p.removed[0].edge, Edge::new("c", "d"));
        assert_eq!(p.components.len(), 2);
        let nodes: Vec<Vec<&str>> = p.components.iter().map(|c| c.nodes().collect()).collect();
        assert_eq!(nodes, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
        assert_eq!(p.components[0].edge_count(), 3);
    }

    #[test]
    fn input_graph_is_untouched() {
        let g = barbell();
        let hash = g.content_hash();
        let p = partition(&g, 5, 2).expect("partition");
        assert_eq!(g.content_hash(), hash);
        assert_eq!(g.edge_count(), 7);
        assert_eq!(p.working.edge_count(), 6);
    }

    #[test]
    fn target_one_on_connected_graph_removes_nothing() {
        let g = barbell();
        let p = partition(&g, 5, 1).expect("partition");
        assert!(p.removed.is_empty());
        assert_eq!(p.components.len(), 1);
        assert_eq!(p.working.edge_count(), g.edge_count());
    }

    #[test]
    fn singletons_are_dropped_but_counted() {
        // Path a - b - c: removing the top edge (a,b) vs (b,c) tie → (a,b)
        // goes first, leaving {a} and {b, c}.
        let g = FollowGraph::from_edges([("a", "b"), ("b", "c")]);
        let p = partition(&g, 3, 2).expect("partition");
        assert_eq!(p.component_count, 2);
        assert_eq!(p.components.len(), 1);
        assert_eq!(p.components[0].nodes().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn unreachable_target_is_an_error() {
        let g = FollowGraph::from_edges([("a", "b"), ("b", "c")]);
        let err = partition(&g, 3, 4).unwrap_err();
        assert_eq!(
            err,
            ClusterError::UnreachableTargetComponents {
                target: 4,
                reached: 3
            }
        );
    }

    #[test]
    fn empty_and_single_node_graphs_cannot_split() {
        let empty = FollowGraph::new();
        assert!(matches!(
            partition(&empty, 3, 2),
            Err(ClusterError::UnreachableTargetComponents { reached: 0, .. })
        ));

        let mut single = FollowGraph::new();
        single.add_node("only");
        assert!(matches!(
            partition(&single, 3, 2),
            Err(ClusterError::UnreachableTargetComponents { reached: 1, .. })
        ));
    }

    #[test]
    fn exact_edge_exhaustion_still_succeeds() {
        // Removing both edges yields exactly three components.
        let g = FollowGraph::from_edges([("a", "b"), ("b", "c")]);
        let p = partition(&g, 3, 3).expect("partition");
        assert_eq!(p.removed.len(), 2);
        assert_eq!(p.working.edge_count(), 0);
        assert!(p.components.is_empty(), "all singletons");
    }

    #[test]
    fn parallel_partition_matches_sequential() {
        let g = barbell();
        let seq = partition(&g, 4, 2).expect("sequential");
        let par = partition_with(
            &g,
            &PartitionConfig {
                max_depth: 4,
                target_components: 2,
                parallel: true,
            },
        )
        .expect("parallel");
        assert_eq!(seq.removed, par.removed);
        assert_eq!(seq.working.content_hash(), par.working.content_hash());
    }
}
