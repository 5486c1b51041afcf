//! `bvol resolve` — Resolve a volume identifier to its device path.

use blockvol_common::types::VolumeId;
use blockvol_core::DiskManager;
use clap::Args;

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Volume identifier as known to the storage provider.
    pub volume_id: String,
}

/// Executes the `resolve` command.
///
/// Prints the stable by-id path, which is what later mount and
/// verification calls should be given.
///
/// # Errors
///
/// Returns an error if the identifier is invalid or no block device
/// backs it.
pub fn execute(args: &ResolveArgs, manager: &DiskManager, json: bool) -> anyhow::Result<()> {
    let volume_id = VolumeId::new(args.volume_id.as_str())?;
    let path = manager.device_path(&volume_id)?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "volume_id": volume_id,
            "device": path,
        }))?;
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
