//! `cohort partition`: split the follow graph into clusters.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use cohort_cluster::betweenness::ScoredEdge;
use cohort_cluster::partition::{PartitionConfig, partition_with};
use cohort_cluster::GraphStats;
use cohort_core::graph::{Edge, FollowGraph};
use serde::Serialize;
use tracing::info;

use super::{DepthArgs, GraphArgs, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `cohort partition`.
#[derive(Args, Debug, Default)]
pub struct PartitionArgs {
    /// Number of connected components to reach (singletons count).
    #[arg(long, value_name = "N")]
    pub clusters: Option<usize>,

    /// Spread the betweenness pass over all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Also write the clusters as JSON to FILE.
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    #[command(flatten)]
    pub depth: DepthArgs,

    #[command(flatten)]
    pub graph: GraphArgs,
}

/// One cluster: its members and the edges among them.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
}

impl ClusterReport {
    fn from_graph(component: &FollowGraph) -> Self {
        Self {
            nodes: component.nodes().map(str::to_string).collect(),
            edges: component.edges(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PartitionReport {
    input: GraphStats,
    max_depth: usize,
    target: usize,
    component_count: usize,
    removed: Vec<ScoredEdge>,
    clusters: Vec<ClusterReport>,
}

/// Execute `cohort partition`.
pub fn run_partition(
    args: &PartitionArgs,
    output: OutputMode,
    session: &Session,
) -> anyhow::Result<()> {
    let users = session.users()?;
    let graph = session.graph(&users, &args.graph);
    let config = PartitionConfig {
        max_depth: session.max_depth(&args.depth),
        target_components: args.clusters.unwrap_or(session.config.partition.clusters),
        parallel: args.parallel || session.config.partition.parallel,
    };
    let result = partition_with(&graph, &config)?;

    let report = PartitionReport {
        input: GraphStats::from_graph(&graph),
        max_depth: config.max_depth,
        target: config.target_components,
        component_count: result.component_count,
        removed: result.removed,
        clusters: result.components.iter().map(ClusterReport::from_graph).collect(),
    };

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(&report.clusters)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), clusters = report.clusters.len(), "saved clusters");
    }

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(r: &PartitionReport, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, c) in r.clusters.iter().enumerate() {
        writeln!(w, "{i}\t{}\t{}", c.nodes.len(), c.nodes.join(","))?;
    }
    Ok(())
}

fn render_pretty(r: &PartitionReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Partition")?;
    pretty_kv(w, "Input", format!("{} nodes, {} edges", r.input.node_count, r.input.edge_count))?;
    pretty_kv(w, "Max depth", r.max_depth.to_string())?;
    pretty_kv(w, "Target", r.target.to_string())?;
    pretty_kv(w, "Components", r.component_count.to_string())?;
    pretty_kv(w, "Edges removed", r.removed.len().to_string())?;
    writeln!(w)?;

    for s in &r.removed {
        writeln!(w, "  - {:<40} {:>10.3}", s.edge.to_string(), s.score)?;
    }
    if !r.removed.is_empty() {
        writeln!(w)?;
    }

    for (i, c) in r.clusters.iter().enumerate() {
        pretty_section(
            w,
            &format!("Cluster {} ({} nodes, {} edges)", i + 1, c.nodes.len(), c.edges.len()),
        )?;
        for node in &c.nodes {
            writeln!(w, "  {node}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
