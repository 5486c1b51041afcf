//! `bvol mount` / `bvol format-mount` — Mount a device on a target path.

use std::path::PathBuf;

use blockvol_core::DiskManager;
use clap::Args;

/// Arguments shared by the `mount` and `format-mount` commands.
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Device path, usually the output of `bvol resolve`.
    pub device: PathBuf,

    /// Mount point. Must already exist.
    pub target: PathBuf,

    /// Filesystem type (defaults to the configured default).
    #[arg(short = 't', long = "type", default_value = "")]
    pub fs_type: String,

    /// Mount options, comma-separated or repeated.
    #[arg(short, long = "options", value_delimiter = ',')]
    pub options: Vec<String>,
}

/// Executes `mount`, or `format-mount` when `format` is set.
///
/// # Errors
///
/// Returns an error if probing, formatting, or mounting fails.
pub fn execute(args: &MountArgs, manager: &DiskManager, format: bool) -> anyhow::Result<()> {
    tracing::info!(
        device = %args.device.display(),
        target = %args.target.display(),
        format,
        "mount requested"
    );

    if format {
        manager.format_and_mount(&args.device, &args.target, &args.fs_type, &args.options)?;
    } else {
        manager.mount_to_target(&args.device, &args.target, &args.fs_type, &args.options)?;
    }

    println!(
        "Mounted {} on {}",
        args.device.display(),
        args.target.display()
    );
    Ok(())
}
