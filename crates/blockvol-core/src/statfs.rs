//! Filesystem statistics pass-through for capacity reporting.

use std::path::Path;

use blockvol_common::error::{BlockvolError, Result};
use blockvol_common::types::FsStats;

/// Returns raw block and inode counts for the filesystem holding `path`.
///
/// # Errors
///
/// Returns [`BlockvolError::Io`] if `statfs(2)` fails.
pub fn fs_stats(path: &Path) -> Result<FsStats> {
    let stats = nix::sys::statfs::statfs(path).map_err(|e| BlockvolError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    Ok(FsStats {
        block_size: widen(stats.block_size()),
        blocks: widen(stats.blocks()),
        blocks_free: widen(stats.blocks_free()),
        blocks_available: widen(stats.blocks_available()),
        files: widen(stats.files()),
        files_free: widen(stats.files_free()),
    })
}

// statfs field widths and signedness differ between libc targets.
fn widen<T: TryInto<u64>>(value: T) -> u64 {
    value.try_into().unwrap_or_default()
}
