//! [`DiskTools`] backed by host binaries and syscalls.

use std::path::{Path, PathBuf};
use std::process::Command;

use blockvol_common::config::DiskConfig;
use blockvol_common::error::{BlockvolError, Result};

use super::DiskTools;
use crate::probe;

/// Runs `blkid` and `mkfs.<type>` found on `PATH`, and mounts through `mount(2)`.
#[derive(Debug, Clone)]
pub struct SystemTools {
    blkid_binary: String,
    mkfs_prefix: String,
    reserved_blocks_percent: u8,
}

impl SystemTools {
    /// Creates the tool set described by `config`.
    #[must_use]
    pub fn from_config(config: &DiskConfig) -> Self {
        Self {
            blkid_binary: config.blkid_binary.clone(),
            mkfs_prefix: config.mkfs_prefix.clone(),
            reserved_blocks_percent: config.reserved_blocks_percent,
        }
    }

    /// Name of the formatter binary for `fs_type`.
    #[must_use]
    pub fn mkfs_binary(&self, fs_type: &str) -> String {
        format!("{}{fs_type}", self.mkfs_prefix)
    }

    fn locate(binary: &str) -> std::result::Result<PathBuf, String> {
        which::which(binary).map_err(|e| format!("{binary} not found: {e}"))
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::from_config(&DiskConfig::default())
    }
}

impl DiskTools for SystemTools {
    fn probe(&self, device: &Path) -> Result<String> {
        let probe_failed = |message: String| BlockvolError::ProbeFailed {
            device: device.to_path_buf(),
            message,
        };

        let blkid = Self::locate(&self.blkid_binary).map_err(probe_failed)?;
        let output = Command::new(&blkid)
            .args(probe::BLKID_ARGS)
            .arg(device)
            .output()
            .map_err(|e| probe_failed(format!("failed to run {}: {e}", blkid.display())))?;

        probe::interpret_blkid(device, output.status.code(), &output.stdout, &output.stderr)
    }

    fn format(&self, device: &Path, fs_type: &str) -> Result<()> {
        let format_failed = |message: String| BlockvolError::FormatFailed {
            device: device.to_path_buf(),
            fs_type: fs_type.to_string(),
            message,
        };

        let mkfs = Self::locate(&self.mkfs_binary(fs_type)).map_err(format_failed)?;
        tracing::info!(
            device = %device.display(),
            fs_type,
            mkfs = %mkfs.display(),
            "formatting device"
        );

        let output = Command::new(&mkfs)
            .args(["-m", &self.reserved_blocks_percent.to_string()])
            .arg(device)
            .output()
            .map_err(|e| format_failed(format!("failed to run {}: {e}", mkfs.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(device = %device.display(), stderr = %stderr.trim(), "mkfs failed");
            return Err(format_failed(format!(
                "{} exited with {}: {}",
                mkfs.display(),
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(device = %device.display(), fs_type, "device formatted");
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn mount(&self, device: &Path, target: &Path, fs_type: &str, options: &[String]) -> Result<()> {
        crate::mount::host::mount_device(device, target, fs_type, options)
    }

    #[cfg(not(target_os = "linux"))]
    fn mount(&self, _device: &Path, _target: &Path, _fs_type: &str, _options: &[String]) -> Result<()> {
        Err(BlockvolError::Config {
            message: "Linux required for block device mounts".into(),
        })
    }
}
