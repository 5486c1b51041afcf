//! Host capabilities that mutate or inspect devices.
//!
//! Probing, formatting, and mounting are reached through [`DiskTools`] so
//! the orchestration logic can be exercised against fakes with canned
//! outcomes instead of real devices.

mod system;

use std::path::Path;

use blockvol_common::error::Result;

pub use system::SystemTools;

/// Device-level operations performed on the host.
pub trait DiskTools: Send + Sync {
    /// Returns the filesystem type found on `device`, or an empty string if
    /// the device carries no identifiable filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeFailed`](blockvol_common::error::BlockvolError::ProbeFailed)
    /// if identification itself fails.
    fn probe(&self, device: &Path) -> Result<String>;

    /// Writes a new `fs_type` filesystem onto `device`, destroying its contents.
    ///
    /// # Errors
    ///
    /// Returns [`FormatFailed`](blockvol_common::error::BlockvolError::FormatFailed)
    /// if the formatter cannot be run or exits unsuccessfully.
    fn format(&self, device: &Path, fs_type: &str) -> Result<()>;

    /// Mounts `device` on `target` as `fs_type` with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`MountFailed`](blockvol_common::error::BlockvolError::MountFailed)
    /// if the host rejects the mount.
    fn mount(&self, device: &Path, target: &Path, fs_type: &str, options: &[String]) -> Result<()>;
}
