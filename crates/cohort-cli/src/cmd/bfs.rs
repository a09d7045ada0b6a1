//! `cohort bfs`: inspect one depth-bounded BFS tree.

use std::io::Write;

use clap::Args;
use cohort_cluster::bfs::{BfsEntry, build_bfs_tree};
use serde::Serialize;

use super::{DepthArgs, GraphArgs, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `cohort bfs`.
#[derive(Args, Debug)]
pub struct BfsArgs {
    /// Node id to start from.
    #[arg(long)]
    pub root: String,

    #[command(flatten)]
    pub depth: DepthArgs,

    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct BfsReport<'g> {
    root: String,
    max_depth: usize,
    reached: usize,
    nodes: Vec<BfsEntry<'g>>,
}

/// Execute `cohort bfs`.
pub fn run_bfs(args: &BfsArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let users = session.users()?;
    let graph = session.graph(&users, &args.graph);
    let max_depth = session.max_depth(&args.depth);
    let tree = build_bfs_tree(&graph, &args.root, max_depth)?;

    let report = BfsReport {
        root: args.root.clone(),
        max_depth,
        reached: tree.len(),
        nodes: tree.entries(),
    };

    render_mode(output, &report, render_bfs_text, render_bfs_pretty)
}

fn render_bfs_text(r: &BfsReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for e in &r.nodes {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            e.node,
            e.distance,
            e.path_count,
            e.parents.join(",")
        )?;
    }
    Ok(())
}

fn render_bfs_pretty(r: &BfsReport<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("BFS from {}", r.root))?;
    pretty_kv(w, "Max depth", r.max_depth.to_string())?;
    pretty_kv(w, "Reached", r.reached.to_string())?;
    writeln!(w)?;
    writeln!(w, "  {:<24} {:>5} {:>8}  PARENTS", "NODE", "DIST", "PATHS")?;
    for e in &r.nodes {
        writeln!(
            w,
            "  {:<24} {:>5} {:>8}  {}",
            e.node,
            e.distance,
            e.path_count,
            e.parents.join(", ")
        )?;
    }
    Ok(())
}
