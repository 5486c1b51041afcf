//! `bvol probe` — Report the filesystem type on a device.

use std::path::PathBuf;

use blockvol_core::DiskManager;
use clap::Args;

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Device path to inspect.
    pub device: PathBuf,
}

/// Executes the `probe` command.
///
/// # Errors
///
/// Returns an error if the device cannot be identified.
pub fn execute(args: &ProbeArgs, manager: &DiskManager, json: bool) -> anyhow::Result<()> {
    let fs_type = manager.probe(&args.device)?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "device": args.device,
            "fs_type": fs_type,
        }))?;
    } else if fs_type.is_empty() {
        println!("{}: no filesystem", args.device.display());
    } else {
        println!("{}: {fs_type}", args.device.display());
    }
    Ok(())
}
