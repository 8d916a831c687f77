use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use ospf_path_analysis::config::AnalysisConfig;
use ospf_path_analysis::domain::analysis::aggregation::find_group_paths;
use ospf_path_analysis::domain::analysis::cost_matrix::{cost_matrix, group_cost_matrix};
use ospf_path_analysis::domain::analysis::impact::{QueryScope, analyze_scenario};
use ospf_path_analysis::domain::analysis::traffic::{all_node_pairs, traffic_flow};
use ospf_path_analysis::domain::routing::dijkstra::{dijkstra_trace, shortest_cost};
use ospf_path_analysis::domain::routing::path_enumerator::find_paths_with;
use ospf_path_analysis::domain::utils::cancellation::CancellationToken;
use ospf_path_analysis::domain::utils::id::{GroupId, NodeId};
use ospf_path_analysis::{load_scenario, load_topology, logger};

#[derive(Parser)]
#[command(name = "ospf-path-analysis")]
#[command(about = "Shortest-path, k-path and what-if impact analysis for OSPF-style topologies", long_about = None)]
struct Cli {
    /// Topology JSON file
    #[arg(short, long, global = true, default_value = "topology.json")]
    topology: PathBuf,

    /// Analysis config JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also append log records to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Cancel batch analyses after this many milliseconds
    #[arg(long, global = true, value_name = "MS")]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Minimum total cost between two routers
    Cost { source: String, target: String },

    /// Up to LIMIT cheapest simple paths between two routers
    Paths {
        source: String,
        target: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Step-by-step Dijkstra run between two routers
    Trace { source: String, target: String },

    /// Cheapest paths between two groups over representative routers
    GroupPaths {
        source_group: String,
        destination_group: String,
        #[arg(long)]
        per_pair_limit: Option<usize>,
        #[arg(long)]
        overall_limit: Option<usize>,
    },

    /// Router-to-router cost matrix (all routers when none are given)
    Matrix { nodes: Vec<String> },

    /// Group-to-group cost matrix
    GroupMatrix,

    /// Best-path link usage and transit hubs over all router pairs
    Traffic,

    /// Route changes and risk score for a what-if overrides file
    Impact {
        /// Overrides JSON file
        #[arg(short, long)]
        overrides: PathBuf,

        /// Router pairs as SOURCE:TARGET; every group pair is compared when omitted
        #[arg(long = "pair", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((s, d)) if !s.is_empty() && !d.is_empty() => Ok((s.to_string(), d.to_string())),
        _ => Err(format!("expected SOURCE:TARGET, got '{}'", raw)),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init(cli.log_file.as_deref());
    log::info!("Logger initialized. Starting path analysis.");

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path).with_context(|| format!("loading config '{}'", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let topology = load_topology(&cli.topology, &config).with_context(|| format!("loading topology '{}'", cli.topology.display()))?;

    let cancel = match cli.timeout_ms {
        Some(ms) => CancellationToken::with_deadline(Duration::from_millis(ms)),
        None => CancellationToken::new(),
    };

    match cli.command {
        Commands::Cost { source, target } => {
            let cost = shortest_cost(&topology, &NodeId::new(source), &NodeId::new(target))?;
            print_json(&cost)?;
        }
        Commands::Paths { source, target, limit } => {
            let paths = find_paths_with(&topology, &NodeId::new(source), &NodeId::new(target), limit, &config.enumeration)?;
            print_json(&paths)?;
        }
        Commands::Trace { source, target } => {
            let trace = dijkstra_trace(&topology, &NodeId::new(source), &NodeId::new(target))?;
            print_json(&trace)?;
        }
        Commands::GroupPaths { source_group, destination_group, per_pair_limit, overall_limit } => {
            let report = find_group_paths(
                &topology,
                &GroupId::new(source_group),
                &GroupId::new(destination_group),
                per_pair_limit.unwrap_or(config.aggregation.per_pair_limit),
                overall_limit.unwrap_or(config.aggregation.overall_limit),
                &config,
                &cancel,
            )?;
            print_json(&report)?;
        }
        Commands::Matrix { nodes } => {
            let nodes: Vec<NodeId> = nodes.into_iter().map(NodeId::new).collect();
            print_json(&cost_matrix(&topology, &nodes, &config, &cancel)?)?;
        }
        Commands::GroupMatrix => {
            print_json(&group_cost_matrix(&topology, &config, &cancel)?)?;
        }
        Commands::Traffic => {
            let pairs = all_node_pairs(&topology);
            print_json(&traffic_flow(&topology, &pairs, &config, &cancel)?)?;
        }
        Commands::Impact { overrides, pairs } => {
            let scenario = load_scenario(&overrides, &topology, &config).with_context(|| format!("loading overrides '{}'", overrides.display()))?;

            let scope = if pairs.is_empty() {
                QueryScope::AllGroupPairs
            } else {
                QueryScope::NodePairs(pairs.into_iter().map(|(s, d)| (NodeId::new(s), NodeId::new(d))).collect())
            };

            let (_, report) = analyze_scenario(&topology, &scenario, &scope, &config, &cancel)?;
            print_json(&report)?;
        }
    }

    Ok(())
}
