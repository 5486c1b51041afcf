//! Volume identifier to block device resolution.
//!
//! Attached volumes appear as stable symlinks named
//! `<by_id_dir>/<prefix><volume-id>`, pointing at a kernel device node
//! (`/dev/sdb`, ...) whose name may change across reattachments. The
//! symlink is resolved on every call and never cached.

use std::fs::FileType;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use blockvol_common::error::{BlockvolError, Result};
use blockvol_common::types::VolumeId;

/// Builds the stable symlink path for `volume_id`.
#[must_use]
pub fn device_path(by_id_dir: &Path, prefix: &str, volume_id: &VolumeId) -> PathBuf {
    by_id_dir.join(format!("{prefix}{volume_id}"))
}

/// Resolves `volume_id` to a verified block device.
///
/// Returns the stable symlink path rather than the resolved node, so the
/// result stays valid across device renumbering and matches the mount
/// source recorded by the kernel.
///
/// # Errors
///
/// Returns [`BlockvolError::DeviceNotFound`] if the symlink cannot be
/// resolved or its target cannot be stat'ed, or
/// [`BlockvolError::NotABlockDevice`] if the target is not a block device.
pub fn resolve_device(by_id_dir: &Path, prefix: &str, volume_id: &VolumeId) -> Result<PathBuf> {
    let path = device_path(by_id_dir, prefix, volume_id);
    let file_type = inspect(&path)?;
    if !file_type.is_block_device() {
        return Err(BlockvolError::NotABlockDevice { path });
    }
    tracing::debug!(volume_id = %volume_id, path = %path.display(), "resolved device");
    Ok(path)
}

/// Returns whether `path` resolves to a block device.
///
/// Character devices, regular files, and directories yield `Ok(false)`.
///
/// # Errors
///
/// Returns [`BlockvolError::DeviceNotFound`] if `path` cannot be resolved.
pub fn is_block_device(path: &Path) -> Result<bool> {
    Ok(inspect(path)?.is_block_device())
}

fn inspect(path: &Path) -> Result<FileType> {
    let not_found = |e: std::io::Error| BlockvolError::DeviceNotFound {
        path: path.to_path_buf(),
        source: e,
    };
    let real = std::fs::canonicalize(path).map_err(not_found)?;
    let metadata = std::fs::metadata(&real).map_err(not_found)?;
    tracing::trace!(path = %path.display(), real = %real.display(), "device symlink resolved");
    Ok(metadata.file_type())
}
