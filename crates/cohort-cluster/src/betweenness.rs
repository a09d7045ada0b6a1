//! Approximate edge betweenness.
//!
//! # Overview
//!
//! Edge betweenness counts how many shortest paths cross an edge. Edges
//! with high betweenness are the bridges between communities, which makes
//! them the edges Girvan-Newman removes first.
//!
//! # Algorithm
//!
//! 1. For every node as root (ascending identifier), build a depth-bounded
//!    BFS tree ([`crate::bfs`]).
//! 2. Accumulate that tree's edge credit bottom-up ([`crate::credit`]).
//! 3. Sum the credit per edge over all roots, then halve: each shortest path
//!    between `s` and `t` is counted once from the BFS rooted at `s` and once
//!    from the BFS rooted at `t`.
//!
//! The result is "approximate" because BFS stops at `max_depth`; pairs
//! farther apart than the bound contribute nothing.
//!
//! # Parallelism
//!
//! Roots are independent. With [`BetweennessConfig::parallel`] the per-root
//! work runs on the rayon pool, one chunk of roots at a time. Partial
//! results are merged in root order, so the sums are bit-identical to the
//! sequential run.
//!
//! # Output
//!
//! [`Betweenness`] holds a score for **every** edge of the input graph.
//! Edges that no root credited (only possible with `max_depth == 0`) score
//! `0.0`.

use std::collections::{BTreeMap, HashMap};

use cohort_core::graph::{Edge, FollowGraph};
use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::bfs::BfsTree;
use crate::credit::{EdgeKey, accumulate_credit};

/// Roots handed to the rayon pool per merge step.
const PARALLEL_CHUNK: usize = 256;

/// Settings for [`edge_betweenness_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetweennessConfig {
    /// BFS depth bound.
    pub max_depth: usize,
    /// Spread per-root work over the rayon thread pool.
    pub parallel: bool,
}

impl BetweennessConfig {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            parallel: false,
        }
    }
}

/// An edge and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEdge {
    pub edge: Edge,
    pub score: f64,
}

/// Betweenness score per canonical edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Betweenness {
    scores: BTreeMap<Edge, f64>,
}

impl Betweenness {
    /// Score of the edge between `a` and `b`, in either order.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.scores.get(&Edge::new(a, b)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate edges in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&Edge, f64)> + '_ {
        self.scores.iter().map(|(edge, &score)| (edge, score))
    }

    /// All edges by descending score; ties by ascending canonical edge.
    ///
    /// This is the partitioner's removal order.
    #[must_use]
    pub fn ranked(&self) -> Vec<ScoredEdge> {
        let mut ranked: Vec<ScoredEdge> = self
            .iter()
            .map(|(edge, score)| ScoredEdge {
                edge: edge.clone(),
                score,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.edge.cmp(&b.edge))
        });
        ranked
    }

    /// The `n` highest-scoring edges, in [`ranked`](Self::ranked) order.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<ScoredEdge> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl Serialize for Betweenness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(edge, score)| ScoredEdge {
            edge: edge.clone(),
            score,
        }))
    }
}

/// Edge betweenness of `graph` with BFS bounded at `max_depth`, computed
/// sequentially.
#[must_use]
pub fn edge_betweenness(graph: &FollowGraph, max_depth: usize) -> Betweenness {
    edge_betweenness_with(graph, &BetweennessConfig::new(max_depth))
}

/// Edge betweenness with explicit settings.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn edge_betweenness_with(graph: &FollowGraph, config: &BetweennessConfig) -> Betweenness {
    if graph.is_empty() {
        return Betweenness::default();
    }

    let roots: Vec<NodeIndex> = graph.node_indices().collect();
    let mut totals: HashMap<EdgeKey, f64> = HashMap::with_capacity(graph.edge_count());

    if config.parallel {
        for chunk in roots.chunks(PARALLEL_CHUNK) {
            let partials: Vec<Vec<(EdgeKey, f64)>> = chunk
                .par_iter()
                .map(|&root| root_credit(graph, root, config.max_depth))
                .collect();
            for partial in partials {
                merge(&mut totals, partial);
            }
        }
    } else {
        for &root in &roots {
            merge(&mut totals, root_credit(graph, root, config.max_depth));
        }
    }

    let scores: BTreeMap<Edge, f64> = graph
        .edges()
        .into_iter()
        .map(|edge| {
            let total = graph
                .node_index(edge.first())
                .zip(graph.node_index(edge.second()))
                .and_then(|key| totals.get(&key))
                .copied()
                .unwrap_or(0.0);
            (edge, total / 2.0)
        })
        .collect();

    debug!(
        roots = roots.len(),
        scored = scores.len(),
        parallel = config.parallel,
        "edge betweenness computed"
    );
    Betweenness { scores }
}

fn root_credit(graph: &FollowGraph, root: NodeIndex, max_depth: usize) -> Vec<(EdgeKey, f64)> {
    let tree = BfsTree::grow(graph, root, max_depth);
    accumulate_credit(&tree).credits.into_iter().collect()
}

fn merge(totals: &mut HashMap<EdgeKey, f64>, partial: Vec<(EdgeKey, f64)>) {
    for (key, credit) in partial {
        *totals.entry(key).or_insert(0.0) += credit;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
