pub mod betweenness;
pub mod bfs;
pub mod dot;
pub mod partition;
pub mod summary;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use cohort_cluster::clamp_depth;
use cohort_core::build::{build_follow_graph, count_friends, min_degree_subgraph};
use cohort_core::config::{CohortConfig, load_config};
use cohort_core::graph::FollowGraph;
use cohort_core::records::{UserRecord, load_users};
use tracing::debug;

/// Graph-shaping flags shared by every graph command.
#[derive(Args, Debug, Default, Clone)]
pub struct GraphArgs {
    /// Keep followed accounts with more than N followers among the users.
    #[arg(long, value_name = "N")]
    pub min_common: Option<usize>,

    /// Drop nodes with degree below N before analysis.
    #[arg(long, value_name = "N")]
    pub min_degree: Option<usize>,
}

/// BFS depth flag shared by the betweenness commands.
#[derive(Args, Debug, Default, Clone)]
pub struct DepthArgs {
    /// BFS depth bound. Negative values are treated as zero.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_depth: Option<i64>,
}

/// Everything a command needs before it touches the graph: merged config
/// and the resolved records path.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: CohortConfig,
    pub users_path: PathBuf,
}

impl Session {
    /// Load config and resolve the records path. `--users` beats the config.
    pub fn load(
        users_flag: Option<&Path>,
        config_flag: Option<&Path>,
        working_dir: &Path,
    ) -> anyhow::Result<Self> {
        let config = load_config(config_flag, working_dir)?;
        let users_path = users_flag.map_or_else(
            || working_dir.join(&config.users),
            |p| working_dir.join(p),
        );
        debug!(users = %users_path.display(), "resolved session");
        Ok(Self { config, users_path })
    }

    pub fn users(&self) -> anyhow::Result<Vec<UserRecord>> {
        load_users(&self.users_path)
            .with_context(|| format!("loading users from {}", self.users_path.display()))
    }

    pub fn max_depth(&self, args: &DepthArgs) -> usize {
        clamp_depth(args.max_depth.unwrap_or(self.config.partition.max_depth))
    }

    /// Build the follow graph, then apply the degree filter.
    pub fn graph(&self, users: &[UserRecord], args: &GraphArgs) -> FollowGraph {
        let min_common = args.min_common.unwrap_or(self.config.graph.min_common);
        let min_degree = args.min_degree.unwrap_or(self.config.graph.min_degree);
        let counts = count_friends(users);
        let graph = build_follow_graph(users, &counts, min_common);
        if min_degree == 0 {
            graph
        } else {
            min_degree_subgraph(&graph, min_degree)
        }
    }
}
