//! `bvol check-shared` — Verify shared mount state of a target.

use std::path::PathBuf;

use blockvol_core::DiskManager;
use clap::Args;

/// Arguments for the `check-shared` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Mount point to verify.
    pub target: PathBuf,

    /// Expected mount source; skipped when omitted.
    #[arg(long, default_value = "")]
    pub source: String,
}

/// Executes the `check-shared` command.
///
/// An unmounted target is reported, not treated as a failure.
///
/// # Errors
///
/// Returns an error if the target is mounted but not shared, is backed by
/// a different source, or the mount table cannot be read.
pub fn execute(args: &CheckArgs, manager: &DiskManager, json: bool) -> anyhow::Result<()> {
    let mounted = manager.is_shared_mounted(&args.target, &args.source)?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "target": args.target,
            "shared_mounted": mounted,
        }))?;
    } else if mounted {
        println!("{} is shared-mounted.", args.target.display());
    } else {
        println!("{} is not mounted.", args.target.display());
    }
    Ok(())
}
