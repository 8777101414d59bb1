//! REAM Members - inspect gossip membership snapshots
//!
//! Classifies servers in a membership dump, checks a cluster against a
//! minimum version, and checks whether a registered node accepts RPCs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use ream_membership::gate::meets_minimum_version_with;
use ream_membership::membership::servers;
use ream_membership::{parse_version, GateConfig, GossipMember, InMemorySnapshot, Node, RpcError};

#[derive(Parser)]
#[command(
    name = "ream-members",
    version = "0.1.0",
    about = "REAM Members - inspect gossip membership and version gates",
    long_about = "Reads JSON membership and node snapshots and reports which members \
                  are servers, whether alive servers meet a minimum version, and \
                  whether a node can be sent RPCs."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gate configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the servers found in a membership snapshot
    Classify {
        /// JSON array of gossip members
        members: PathBuf,

        /// Only list alive servers
        #[arg(long)]
        alive: bool,

        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that all alive servers run at least a version
    CheckVersion {
        /// JSON array of gossip members
        members: PathBuf,

        /// Minimum version
        #[arg(short, long)]
        min: String,
    },

    /// Check whether a node can be sent RPCs
    NodeRpc {
        /// JSON array of nodes
        nodes: PathBuf,

        /// Node ID to resolve
        node_id: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => GateConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GateConfig::default(),
    };

    match cli.command {
        Commands::Classify { members, alive, json } => {
            execute_classify(&config, &members, alive, json)
        }
        Commands::CheckVersion { members, min } => {
            execute_check_version(&config, &members, &min)
        }
        Commands::NodeRpc { nodes, node_id } => execute_node_rpc(&config, &nodes, &node_id),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_members(path: &Path) -> Result<Vec<GossipMember>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing membership snapshot {}", path.display()))
}

fn execute_classify(
    config: &GateConfig,
    path: &Path,
    alive_only: bool,
    json: bool,
) -> Result<ExitCode> {
    let members = load_members(path)?;
    let classifier = config.classifier();
    let found: Vec<_> = servers(&classifier, &members)
        .filter(|server| !alive_only || server.is_alive())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(ExitCode::SUCCESS);
    }

    if found.is_empty() {
        println!("{} No servers among {} members", "ℹ".bright_blue(), members.len());
        return Ok(ExitCode::SUCCESS);
    }

    for server in &found {
        println!(
            "  {} {} [{}] build {} raft v{} status {}",
            "●".bright_green(),
            server.to_string().bright_white(),
            server.id.bright_cyan(),
            server.build,
            server.raft_version,
            server.status
        );
    }
    println!("{} {} of {} members are servers", "→".bright_blue(), found.len(), members.len());
    Ok(ExitCode::SUCCESS)
}

/// Whether every alive server in the snapshot meets `min`
fn cluster_meets(config: &GateConfig, path: &Path, min: &str) -> Result<bool> {
    let members = load_members(path)?;
    let min_version = parse_version(min)
        .with_context(|| format!("invalid minimum version {:?}", min))?;
    Ok(meets_minimum_version_with(&config.classifier(), &members, &min_version))
}

fn execute_check_version(config: &GateConfig, path: &Path, min: &str) -> Result<ExitCode> {
    if cluster_meets(config, path, min)? {
        println!("  {} All alive servers meet {}", "✓".bright_green(), min);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("  {} Some alive servers are older than {}", "✗".red(), min);
        Ok(ExitCode::FAILURE)
    }
}

/// Resolve `node_id` through the configured gate. The outer error covers
/// unreadable input, the inner one the gate's verdict.
fn rpc_target(config: &GateConfig, path: &Path, node_id: &str) -> Result<Result<Node, RpcError>> {
    let snapshot = InMemorySnapshot::from_json_file(path)
        .with_context(|| format!("loading node snapshot {}", path.display()))?;
    let gate = config.rpc_gate()?;
    Ok(gate.resolve_rpc_target(&snapshot, node_id))
}

fn rejection_message(err: &RpcError) -> String {
    if err.is_retryable() {
        format!("{} (retry after refresh)", err)
    } else {
        err.to_string()
    }
}

fn execute_node_rpc(config: &GateConfig, path: &Path, node_id: &str) -> Result<ExitCode> {
    match rpc_target(config, path, node_id)? {
        Ok(node) => {
            let id = node.id.bright_cyan();
            println!("  {} {} ({}) supports RPC", "✓".bright_green(), id, node.name);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("  {} {}", "✗".red(), rejection_message(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}
