//! Shared-mount verification.
//!
//! A published volume target must be mounted with shared propagation so
//! that mounts below it are visible to every container using the volume,
//! and it must still be backed by the device the caller expects.

use std::path::Path;

use blockvol_common::error::{BlockvolError, Result};

use super::table::MountRecord;

/// Rejects an empty target path before the mount table is consulted.
///
/// # Errors
///
/// Returns [`BlockvolError::EmptyTargetPath`] if `target` is empty.
pub fn ensure_target(target: &Path) -> Result<()> {
    if target.as_os_str().is_empty() {
        return Err(BlockvolError::EmptyTargetPath);
    }
    Ok(())
}

/// Judges the mount state of `target` from its mount table record.
///
/// `None` means the target is not mounted and yields `Ok(false)`. An empty
/// `expected_source` skips the source comparison.
///
/// # Errors
///
/// Returns [`BlockvolError::NotSharedMounted`] if the record lacks a
/// `shared` optional field, or [`BlockvolError::WrongMountSource`] if its
/// source differs from `expected_source`.
pub fn verify_shared(
    target: &Path,
    expected_source: &str,
    record: Option<&MountRecord>,
) -> Result<bool> {
    let Some(record) = record else {
        tracing::debug!(target = %target.display(), "target is not mounted");
        return Ok(false);
    };

    if !record.is_shared() {
        return Err(BlockvolError::NotSharedMounted {
            target: target.to_path_buf(),
        });
    }

    if !expected_source.is_empty() && record.source != expected_source {
        return Err(BlockvolError::WrongMountSource {
            target: target.to_path_buf(),
            expected: expected_source.to_string(),
            actual: record.source.clone(),
        });
    }

    Ok(true)
}
