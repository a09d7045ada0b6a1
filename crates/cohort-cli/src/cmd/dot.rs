//! `cohort dot`: Graphviz export of the follow graph.
//!
//! Only collected users get a visible label (their screen name when known);
//! followed accounts are drawn as unlabelled points.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use clap::Args;
use cohort_cluster::partition::{PartitionConfig, partition_with};
use cohort_core::graph::FollowGraph;
use cohort_core::records::UserRecord;
use serde::Serialize;

use super::{DepthArgs, GraphArgs, Session};
use crate::output::{OutputMode, render_mode};

/// Arguments for `cohort dot`.
#[derive(Args, Debug, Default)]
pub struct DotArgs {
    /// Export the graph after partitioning instead of the full graph.
    #[arg(long)]
    pub partitioned: bool,

    /// Cluster count used with --partitioned.
    #[arg(long, value_name = "N", requires = "partitioned")]
    pub clusters: Option<usize>,

    #[command(flatten)]
    pub depth: DepthArgs,

    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct DotReport {
    dot: String,
}

/// Execute `cohort dot`.
pub fn run_dot(args: &DotArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let users = session.users()?;
    let graph = session.graph(&users, &args.graph);

    let graph = if args.partitioned {
        let config = PartitionConfig {
            max_depth: session.max_depth(&args.depth),
            target_components: args.clusters.unwrap_or(session.config.partition.clusters),
            parallel: session.config.partition.parallel,
        };
        partition_with(&graph, &config)?.working
    } else {
        graph
    };

    let report = DotReport {
        dot: to_dot(&graph, &users),
    };
    render_mode(
        output,
        &report,
        |r, w| w.write_all(r.dot.as_bytes()),
        |r, w| w.write_all(r.dot.as_bytes()),
    )
}

/// Render `graph` as an undirected Graphviz document.
pub fn to_dot(graph: &FollowGraph, users: &[UserRecord]) -> String {
    let labels: BTreeMap<&str, &str> = users.iter().map(|u| (u.id.as_str(), u.label())).collect();

    let mut out = String::from("graph follows {\n");
    out.push_str("  node [shape=point];\n");
    for id in graph.nodes() {
        match labels.get(id) {
            Some(label) => {
                let _ = writeln!(
                    out,
                    "  {} [shape=plaintext, label={}];",
                    quote(id),
                    quote(label)
                );
            }
            None => {
                let _ = writeln!(out, "  {};", quote(id));
            }
        }
    }
    for edge in graph.edges() {
        let _ = writeln!(out, "  {} -- {};", quote(edge.first()), quote(edge.second()));
    }
    out.push_str("}\n");
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
