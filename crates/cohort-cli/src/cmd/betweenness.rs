//! `cohort betweenness`: ranked edge betweenness of the follow graph.

use std::io::Write;

use clap::Args;
use cohort_cluster::betweenness::{BetweennessConfig, ScoredEdge, edge_betweenness_with};
use serde::Serialize;

use super::{DepthArgs, GraphArgs, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `cohort betweenness`.
#[derive(Args, Debug, Default)]
pub struct BetweennessArgs {
    /// Show only the N highest-scoring edges.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Spread the per-root work over all cores.
    #[arg(long)]
    pub parallel: bool,

    #[command(flatten)]
    pub depth: DepthArgs,

    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct BetweennessReport {
    max_depth: usize,
    edge_count: usize,
    edges: Vec<ScoredEdge>,
}

/// Execute `cohort betweenness`.
pub fn run_betweenness(
    args: &BetweennessArgs,
    output: OutputMode,
    session: &Session,
) -> anyhow::Result<()> {
    let users = session.users()?;
    let graph = session.graph(&users, &args.graph);
    let config = BetweennessConfig {
        max_depth: session.max_depth(&args.depth),
        parallel: args.parallel || session.config.partition.parallel,
    };
    let scores = edge_betweenness_with(&graph, &config);

    let report = BetweennessReport {
        max_depth: config.max_depth,
        edge_count: scores.len(),
        edges: args.top.map_or_else(|| scores.ranked(), |n| scores.top(n)),
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(r: &BetweennessReport, w: &mut dyn Write) -> std::io::Result<()> {
    for s in &r.edges {
        writeln!(w, "{}\t{}\t{}", s.edge.first(), s.edge.second(), s.score)?;
    }
    Ok(())
}

fn render_pretty(r: &BetweennessReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Edge betweenness")?;
    pretty_kv(w, "Max depth", r.max_depth.to_string())?;
    pretty_kv(w, "Edges scored", r.edge_count.to_string())?;
    writeln!(w)?;
    for (rank, s) in r.edges.iter().enumerate() {
        writeln!(w, "  {:>4}. {:<40} {:>10.3}", rank + 1, s.edge.to_string(), s.score)?;
    }
    Ok(())
}
