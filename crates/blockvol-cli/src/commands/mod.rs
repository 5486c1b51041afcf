//! CLI command definitions and dispatch.

pub mod check;
pub mod info;
pub mod mount;
pub mod probe;
pub mod resolve;
pub mod stats;

use std::path::PathBuf;

use anyhow::Context;
use blockvol_common::config::DiskConfig;
use blockvol_common::constants::BIN_NAME;
use blockvol_core::DiskManager;
use clap::{Parser, Subcommand};

/// bvol — node-local block volume management.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file overriding host defaults.
    #[arg(long, global = true, env = "BLOCKVOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a volume identifier to its block device path.
    Resolve(resolve::ResolveArgs),
    /// Report the filesystem type on a device.
    Probe(probe::ProbeArgs),
    /// Mount a device once, without formatting.
    Mount(mount::MountArgs),
    /// Mount a device, formatting it first if it has no filesystem.
    FormatMount(mount::MountArgs),
    /// Show the mount table record for a target path.
    MountInfo(info::InfoArgs),
    /// Verify that a target is shared-mounted from the expected source.
    CheckShared(check::CheckArgs),
    /// Show filesystem capacity for a path.
    Stats(stats::StatsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => DiskConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DiskConfig::default(),
    };
    let manager = DiskManager::new(config);

    match cli.command {
        Command::Resolve(args) => resolve::execute(&args, &manager, cli.json),
        Command::Probe(args) => probe::execute(&args, &manager, cli.json),
        Command::Mount(args) => mount::execute(&args, &manager, false),
        Command::FormatMount(args) => mount::execute(&args, &manager, true),
        Command::MountInfo(args) => info::execute(&args, &manager, cli.json),
        Command::CheckShared(args) => check::execute(&args, &manager, cli.json),
        Command::Stats(args) => stats::execute(&args, &manager, cli.json),
    }
}
