//! `cohort summary`: who follows what, and what the graph looks like.

use std::io::Write;

use clap::Args;
use cohort_cluster::GraphStats;
use cohort_core::build::{Overlap, count_friends, friend_overlap};
use serde::Serialize;

use super::{GraphArgs, Session};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `cohort summary`.
#[derive(Args, Debug, Default)]
pub struct SummaryArgs {
    /// Number of most-followed accounts to list.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct UserLine {
    id: String,
    label: String,
    friends: usize,
}

#[derive(Debug, Serialize)]
struct Followed {
    account: String,
    followers: usize,
}

/// Report payload for `cohort summary`.
#[derive(Debug, Serialize)]
pub struct Summary {
    users: Vec<UserLine>,
    most_common: Vec<Followed>,
    overlap: Vec<Overlap>,
    graph: GraphStats,
}

/// Execute `cohort summary`.
pub fn run_summary(args: &SummaryArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let users = session.users()?;
    let counts = count_friends(&users);
    let graph = session.graph(&users, &args.graph);

    let payload = Summary {
        users: users
            .iter()
            .map(|u| UserLine {
                id: u.id.clone(),
                label: u.label().to_string(),
                friends: u.friends.len(),
            })
            .collect(),
        most_common: counts
            .most_common(args.top)
            .into_iter()
            .map(|(account, followers)| Followed {
                account: account.to_string(),
                followers,
            })
            .collect(),
        overlap: friend_overlap(&users),
        graph: GraphStats::from_graph(&graph),
    };

    render_mode(output, &payload, render_summary_text, render_summary_pretty)
}

fn render_summary_text(s: &Summary, w: &mut dyn Write) -> std::io::Result<()> {
    for u in &s.users {
        writeln!(w, "user\t{}\t{}\t{}", u.id, u.label, u.friends)?;
    }
    for f in &s.most_common {
        writeln!(w, "common\t{}\t{}", f.account, f.followers)?;
    }
    for o in &s.overlap {
        writeln!(w, "overlap\t{}\t{}\t{}", o.first, o.second, o.shared)?;
    }
    writeln!(
        w,
        "graph\t{}\t{}\t{}",
        s.graph.node_count, s.graph.edge_count, s.graph.component_count
    )
}

fn render_summary_pretty(s: &Summary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Friends per user")?;
    for u in &s.users {
        writeln!(w, "  {:<24} {:>6}", u.label, u.friends)?;
    }
    writeln!(w)?;

    pretty_section(w, "Most common friends")?;
    if s.most_common.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for f in &s.most_common {
        writeln!(w, "  {:<24} {:>6}", f.account, f.followers)?;
    }
    writeln!(w)?;

    pretty_section(w, "Friend overlap")?;
    if s.overlap.is_empty() {
        writeln!(w, "  (fewer than two users)")?;
    }
    for o in &s.overlap {
        writeln!(w, "  {:<24} {:<24} {:>6}", o.first, o.second, o.shared)?;
    }
    writeln!(w)?;

    pretty_section(w, "Graph")?;
    pretty_kv(w, "Nodes", s.graph.node_count.to_string())?;
    pretty_kv(w, "Edges", s.graph.edge_count.to_string())?;
    pretty_kv(w, "Components", s.graph.component_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.graph.density))?;
    pretty_kv(w, "Mean degree", format!("{:.2}", s.graph.mean_degree))?;
    pretty_kv(w, "Max degree", s.graph.max_degree.to_string())?;
    pretty_kv(w, "Content hash", &s.graph.content_hash)
}
