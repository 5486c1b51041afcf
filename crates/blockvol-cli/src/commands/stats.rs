//! `bvol stats` — Show filesystem capacity for a path.

use std::path::PathBuf;

use blockvol_core::DiskManager;
use clap::Args;

use crate::output::format_bytes;

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Any path on the filesystem to report on.
    pub path: PathBuf,
}

/// Executes the `stats` command.
///
/// # Errors
///
/// Returns an error if `statfs(2)` fails for the path.
pub fn execute(args: &StatsArgs, manager: &DiskManager, json: bool) -> anyhow::Result<()> {
    let stats = manager.fs_stats(&args.path)?;

    if json {
        return crate::output::print_json(&stats);
    }

    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "", "TOTAL", "USED", "AVAILABLE"
    );
    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "bytes",
        format_bytes(stats.capacity_bytes()),
        format_bytes(stats.used_bytes()),
        format_bytes(stats.available_bytes())
    );
    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "inodes",
        stats.files,
        stats.used_inodes(),
        stats.files_free
    );
    Ok(())
}
