#![forbid(unsafe_code)]
//! cohort-cluster library.
//!
//! Community detection on a [`FollowGraph`] by approximate Girvan-Newman:
//! score every edge by betweenness once, then remove the highest-scoring
//! edges until the graph splits into the requested number of components.
//!
//! ## Pipeline
//!
//! ```text
//! FollowGraph
//!        ↓  for every root: bfs::build_bfs_tree()
//! BfsTree (distance, path count, parents)
//!        ↓  credit::accumulate_credit()
//! EdgeCredit (per root)
//!        ↓  betweenness::edge_betweenness()   (summed, halved)
//! Betweenness
//!        ↓  partition::partition()
//! Partition (components, working graph, removed edges)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use cohort_cluster::partition::partition;
//!
//! let p = partition(&graph, 5, 3)?;
//! for (i, component) in p.components.iter().enumerate() {
//!     println!("cluster {i}: {} nodes", component.node_count());
//! }
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Fallible operations return [`ClusterError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! [`FollowGraph`]: cohort_core::graph::FollowGraph

pub mod betweenness;
pub mod bfs;
pub mod credit;
pub mod error;
pub mod partition;
pub mod stats;

pub use betweenness::{Betweenness, BetweennessConfig, ScoredEdge, edge_betweenness};
pub use bfs::{BfsTree, build_bfs_tree, clamp_depth};
pub use error::ClusterError;
pub use partition::{Partition, PartitionConfig, partition};
pub use stats::GraphStats;
