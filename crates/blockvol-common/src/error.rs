//! Unified error type for the blockvol workspace.
//!
//! Every failure of the disk layer is returned as a [`BlockvolError`] value.
//! The variants are deliberately fine-grained so that the calling volume
//! service can decide between retrying, remounting, or failing the request.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BlockvolError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The device path for a volume could not be resolved or stat'ed.
    #[error("device not found at {path}: {source}")]
    DeviceNotFound {
        /// Stable device path that was looked up.
        path: PathBuf,
        /// Underlying resolution error.
        source: std::io::Error,
    },

    /// The resolved path exists but is not a block device.
    #[error("{path} is not a block device")]
    NotABlockDevice {
        /// Path that was checked.
        path: PathBuf,
    },

    /// A mount table line violates the expected field layout.
    #[error("malformed mount table line ({reason}): {line}")]
    MalformedMountTable {
        /// The offending line, verbatim.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A kernel pseudo-file kept changing between consecutive reads.
    #[error("content of {path} was not consistent after {attempts} attempts")]
    InconsistentRead {
        /// File that was read.
        path: PathBuf,
        /// Number of read attempts made.
        attempts: usize,
    },

    /// The filesystem identification tool failed.
    #[error("probing {device} failed: {message}")]
    ProbeFailed {
        /// Device that was probed.
        device: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The formatting tool failed. The device contents are indeterminate.
    #[error("formatting {device} as {fs_type} failed: {message}")]
    FormatFailed {
        /// Device that was being formatted.
        device: PathBuf,
        /// Requested filesystem type.
        fs_type: String,
        /// Description of the failure.
        message: String,
    },

    /// The host mount facility rejected the request.
    ///
    /// `source.raw_os_error()` carries the kernel errno (`EBUSY`, `EINVAL`,
    /// `ENODEV`, ...) for callers that need to tell the causes apart.
    #[error("mounting {device} on {target} as {fs_type} failed: {source}")]
    MountFailed {
        /// Device or source being mounted.
        device: PathBuf,
        /// Mount point.
        target: PathBuf,
        /// Filesystem type passed to the kernel.
        fs_type: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A mount-state query was made with an empty target path.
    #[error("target path is empty")]
    EmptyTargetPath,

    /// The target is mounted but without shared propagation.
    #[error("{target} is mounted but not shared")]
    NotSharedMounted {
        /// Mount point that was checked.
        target: PathBuf,
    },

    /// The target is mounted from a different source than expected.
    #[error("{target} is mounted from {actual}, expected {expected}")]
    WrongMountSource {
        /// Mount point that was checked.
        target: PathBuf,
        /// Source the caller expected.
        expected: String,
        /// Source recorded in the mount table.
        actual: String,
    },

    /// Another mutating operation already holds this key.
    #[error("an operation is already in progress for {key}")]
    OperationInProgress {
        /// Volume identifier, device, or target path used as the lock key.
        key: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl BlockvolError {
    /// Returns the kernel errno behind a [`BlockvolError::MountFailed`], if any.
    #[must_use]
    pub fn mount_errno(&self) -> Option<i32> {
        match self {
            Self::MountFailed { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BlockvolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_errno_exposes_raw_os_error() {
        let err = BlockvolError::MountFailed {
            device: PathBuf::from("/dev/sdb"),
            target: PathBuf::from("/mnt/data"),
            fs_type: "ext4".into(),
            source: std::io::Error::from_raw_os_error(16),
        };
        assert_eq!(err.mount_errno(), Some(16));
        assert!(err.to_string().contains("/mnt/data"));
    }

    #[test]
    fn mount_errno_is_none_for_other_variants() {
        assert_eq!(BlockvolError::EmptyTargetPath.mount_errno(), None);
    }

    #[test]
    fn wrong_mount_source_names_both_sources() {
        let err = BlockvolError::WrongMountSource {
            target: PathBuf::from("/mnt/data"),
            expected: "/dev/sdc".into(),
            actual: "/dev/sdb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/dev/sdc"), "got: {msg}");
        assert!(msg.contains("/dev/sdb"), "got: {msg}");
    }
}
