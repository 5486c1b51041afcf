//! Format-and-mount orchestration and the public disk operations.

use std::path::{Path, PathBuf};

use blockvol_common::config::DiskConfig;
use blockvol_common::error::Result;
use blockvol_common::types::{FsStats, VolumeId};

use crate::device;
use crate::mount::{self, MountRecord};
use crate::tools::{DiskTools, SystemTools};

/// Entry point for the node service: resolves, probes, formats, mounts,
/// and inspects volumes on this host.
///
/// All methods are synchronous and re-read host state on every call.
#[derive(Debug, Clone)]
pub struct DiskManager<T = SystemTools> {
    config: DiskConfig,
    tools: T,
}

impl DiskManager<SystemTools> {
    /// Creates a manager that drives the host's own tools.
    #[must_use]
    pub fn new(config: DiskConfig) -> Self {
        let tools = SystemTools::from_config(&config);
        Self { config, tools }
    }
}

impl Default for DiskManager<SystemTools> {
    fn default() -> Self {
        Self::new(DiskConfig::default())
    }
}

impl<T: DiskTools> DiskManager<T> {
    /// Creates a manager with caller-supplied tools.
    #[must_use]
    pub const fn with_tools(config: DiskConfig, tools: T) -> Self {
        Self { config, tools }
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &DiskConfig {
        &self.config
    }

    /// The tools in use.
    #[must_use]
    pub const fn tools(&self) -> &T {
        &self.tools
    }

    /// Resolves `volume_id` to its stable block device path.
    ///
    /// # Errors
    ///
    /// Returns `DeviceNotFound` or `NotABlockDevice`.
    pub fn device_path(&self, volume_id: &VolumeId) -> Result<PathBuf> {
        device::resolve_device(&self.config.by_id_dir, &self.config.device_prefix, volume_id)
    }

    /// Returns whether `path` resolves to a block device.
    ///
    /// # Errors
    ///
    /// Returns `DeviceNotFound` if `path` cannot be resolved.
    pub fn is_block_device(&self, path: &Path) -> Result<bool> {
        device::is_block_device(path)
    }

    /// Returns the filesystem type on `device`, empty if there is none.
    ///
    /// # Errors
    ///
    /// Returns `ProbeFailed` if the device cannot be identified.
    pub fn probe(&self, device: &Path) -> Result<String> {
        self.tools.probe(device)
    }

    /// Mounts `device` on `target` in a single attempt.
    ///
    /// An empty `fs_type` falls back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns `MountFailed` carrying the kernel errno.
    pub fn mount_to_target(
        &self,
        device: &Path,
        target: &Path,
        fs_type: &str,
        options: &[String],
    ) -> Result<()> {
        let fs_type = self.config.fs_type_or_default(fs_type);
        self.tools.mount(device, target, fs_type, options)
    }

    /// Mounts `device` on `target`, formatting it first only if it carries
    /// no filesystem at all.
    ///
    /// 1. Try to mount. Success returns immediately.
    /// 2. On failure, probe the device. A probe error is returned as is.
    /// 3. If the device already has a filesystem, the mount failure is real
    ///    and the original mount error is returned without formatting.
    /// 4. Otherwise format with `fs_type` and retry the mount exactly once.
    ///
    /// # Errors
    ///
    /// Returns `MountFailed`, `ProbeFailed`, or `FormatFailed` as described.
    pub fn format_and_mount(
        &self,
        device: &Path,
        target: &Path,
        fs_type: &str,
        options: &[String],
    ) -> Result<()> {
        let fs_type = self.config.fs_type_or_default(fs_type);
        tracing::debug!(
            device = %device.display(),
            target = %target.display(),
            fs_type,
            "attempting mount"
        );

        let Err(mount_err) = self.tools.mount(device, target, fs_type, options) else {
            return Ok(());
        };

        tracing::debug!(device = %device.display(), error = %mount_err, "mount failed, probing device");
        let existing = self.tools.probe(device)?;
        if !existing.is_empty() {
            tracing::debug!(
                device = %device.display(),
                existing = %existing,
                "device already formatted, not formatting"
            );
            return Err(mount_err);
        }

        tracing::info!(device = %device.display(), fs_type, "device is unformatted");
        self.tools.format(device, fs_type)?;
        self.tools.mount(device, target, fs_type, options)
    }

    /// Returns the mount table record for `target`, or `None` if it is not
    /// a mount point.
    ///
    /// # Errors
    ///
    /// Returns `Io`, `InconsistentRead`, or `MalformedMountTable`.
    pub fn mount_info(&self, target: &Path) -> Result<Option<MountRecord>> {
        let raw = mount::consistent_read(
            &self.config.mountinfo_path,
            self.config.mountinfo_read_attempts,
        )?;
        mount::find_mount(&raw, target)
    }

    /// Checks that `target` is mounted with shared propagation and, when
    /// `expected_source` is non-empty, backed by that source.
    ///
    /// Returns `Ok(false)` if `target` is not mounted at all.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTargetPath`, `NotSharedMounted`, `WrongMountSource`, or
    /// any error from reading the mount table.
    pub fn is_shared_mounted(&self, target: &Path, expected_source: &str) -> Result<bool> {
        mount::shared::ensure_target(target)?;
        let record = self.mount_info(target)?;
        mount::shared::verify_shared(target, expected_source, record.as_ref())
    }

    /// Returns `statfs(2)` figures for the filesystem holding `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the call fails.
    pub fn fs_stats(&self, path: &Path) -> Result<FsStats> {
        crate::statfs::fs_stats(path)
    }
}
