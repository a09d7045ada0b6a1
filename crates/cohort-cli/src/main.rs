#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cohort_core::error::ErrorCode;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cohort: community detection on follow graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// User records file (JSON array). Defaults to `users` from config.
    #[arg(long, global = true, value_name = "FILE")]
    users: Option<PathBuf>,

    /// Config file. Defaults to ./cohort.toml, then the user config dir.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Summarize users, shared follows, and the graph",
        long_about = "Report friends per user, the most-followed accounts, pairwise friend overlap, \
                      and statistics of the resulting follow graph.",
        after_help = "EXAMPLES:\n    # Summary of users.json in the current directory\n    cohort summary\n\n    # Ten most common friends, keeping accounts followed by 3+ users\n    cohort summary --top 10 --min-common 2\n\n    # Emit machine-readable output\n    cohort summary --json"
    )]
    Summary(cmd::summary::SummaryArgs),

    #[command(
        about = "Show one BFS tree",
        long_about = "Run a depth-bounded BFS from one node and list every reached node with its \
                      distance, shortest-path count, and parents.",
        after_help = "EXAMPLES:\n    # BFS from a user, three hops out\n    cohort bfs --root 12345 --max-depth 3\n\n    # Emit machine-readable output\n    cohort bfs --root 12345 --json"
    )]
    Bfs(cmd::bfs::BfsArgs),

    #[command(
        about = "Rank edges by betweenness",
        long_about = "Compute approximate edge betweenness over the follow graph and list edges \
                      from highest to lowest score.",
        after_help = "EXAMPLES:\n    # Twenty highest-scoring edges\n    cohort betweenness --top 20\n\n    # Use every core\n    cohort betweenness --parallel --max-depth 4"
    )]
    Betweenness(cmd::betweenness::BetweennessArgs),

    #[command(
        about = "Partition the graph into clusters",
        long_about = "Remove edges in descending betweenness order until the graph has the \
                      requested number of connected components, then list the clusters.",
        after_help = "EXAMPLES:\n    # Three clusters with default settings\n    cohort partition --clusters 3\n\n    # Save the clusters for later use\n    cohort partition --clusters 4 --save clusters.json\n\n    # Emit machine-readable output\n    cohort partition --json"
    )]
    Partition(cmd::partition::PartitionArgs),

    #[command(
        about = "Export the graph as Graphviz DOT",
        long_about = "Write the follow graph (or the partitioned graph) in Graphviz DOT format. \
                      Only users are labelled.",
        after_help = "EXAMPLES:\n    # Render the full graph\n    cohort dot | dot -Tpng -o network.png\n\n    # Render after splitting into three clusters\n    cohort dot --partitioned --clusters 3 | dot -Tpng -o clusters.png"
    )]
    Dot(cmd::dot::DotArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COHORT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cohort=debug,info"
        } else {
            "cohort=info,warn"
        })
    });

    let format = env::var("COHORT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    let Ok(working_dir) = env::current_dir() else {
        return fail(
            output,
            &CliError::from(&anyhow::anyhow!("cannot determine current directory")),
        );
    };

    let session = match cmd::Session::load(
        cli.users.as_deref(),
        cli.config.as_deref(),
        &working_dir,
    ) {
        Ok(session) => session,
        Err(err) => return fail(output, &CliError::from_code(ErrorCode::ConfigParseError, &err)),
    };

    let command_result = match cli.command {
        Commands::Summary(ref args) => cmd::summary::run_summary(args, output, &session),
        Commands::Bfs(ref args) => cmd::bfs::run_bfs(args, output, &session),
        Commands::Betweenness(ref args) => {
            cmd::betweenness::run_betweenness(args, output, &session)
        }
        Commands::Partition(ref args) => cmd::partition::run_partition(args, output, &session),
        Commands::Dot(ref args) => cmd::dot::run_dot(args, output, &session),
    };

    match command_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            fail(output, &CliError::from(&err))
        }
    }
}

fn fail(output: OutputMode, err: &CliError) -> ExitCode {
    if let Err(render_err) = render_error(output, err) {
        error!(error = %render_err, "failed to render error");
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["cohort", "partition", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Partition(_)));
    }

    #[test]
    fn format_flag_parses_value_enum() {
        let cli = Cli::parse_from(["cohort", "--format", "text", "summary"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn negative_depth_is_accepted() {
        let cli = Cli::parse_from(["cohort", "betweenness", "--max-depth", "-1"]);
        let Commands::Betweenness(args) = cli.command else {
            panic!("expected betweenness");
        };
        assert_eq!(args.depth.max_depth, Some(-1));
    }

    #[test]
    fn partition_flags_parse() {
        let cli = Cli::parse_from([
            "cohort",
            "--users",
            "people.json",
            "partition",
            "--clusters",
            "4",
            "--min-common",
            "2",
            "--save",
            "out.json",
        ]);
        assert_eq!(cli.users, Some(PathBuf::from("people.json")));
        let Commands::Partition(args) = cli.command else {
            panic!("expected partition");
        };
        assert_eq!(args.clusters, Some(4));
        assert_eq!(args.graph.min_common, Some(2));
        assert_eq!(args.save, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn clusters_on_dot_requires_partitioned() {
        let err = Cli::try_parse_from(["cohort", "dot", "--clusters", "3"]);
        assert!(err.is_err());
    }
}
