//! Domain primitive types used across the blockvol workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BlockvolError, Result};

/// Identifier of a remote block-storage volume, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId(String);

impl VolumeId {
    /// Creates a volume ID, rejecting values that cannot name a device symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty or contains a path
    /// separator or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains('/') || id.chars().any(char::is_whitespace) {
            return Err(BlockvolError::Config {
                message: format!("invalid volume identifier: {id:?}"),
            });
        }
        Ok(Self(id))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw filesystem statistics for a mounted path, as reported by `statfs(2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsStats {
    /// Optimal transfer block size in bytes.
    pub block_size: u64,
    /// Total data blocks.
    pub blocks: u64,
    /// Free blocks.
    pub blocks_free: u64,
    /// Free blocks available to unprivileged users.
    pub blocks_available: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub files_free: u64,
}

impl FsStats {
    /// Total capacity in bytes.
    #[must_use]
    pub const fn capacity_bytes(&self) -> u64 {
        self.blocks.saturating_mul(self.block_size)
    }

    /// Bytes available to unprivileged users.
    #[must_use]
    pub const fn available_bytes(&self) -> u64 {
        self.blocks_available.saturating_mul(self.block_size)
    }

    /// Bytes in use.
    #[must_use]
    pub const fn used_bytes(&self) -> u64 {
        self.blocks
            .saturating_sub(self.blocks_free)
            .saturating_mul(self.block_size)
    }

    /// Inodes in use.
    #[must_use]
    pub const fn used_inodes(&self) -> u64 {
        self.files.saturating_sub(self.files_free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_id_accepts_uuid() {
        let id = VolumeId::new("3f5c2b1e-0a7d-4c1b-9e2f-6d8a4b3c2e1f").expect("valid id");
        assert_eq!(id.to_string(), "3f5c2b1e-0a7d-4c1b-9e2f-6d8a4b3c2e1f");
    }

    #[test]
    fn volume_id_rejects_path_components() {
        assert!(VolumeId::new("../sda").is_err());
        assert!(VolumeId::new("").is_err());
        assert!(VolumeId::new("a b").is_err());
    }

    #[test]
    fn fs_stats_derived_sizes() {
        let stats = FsStats {
            block_size: 4096,
            blocks: 100,
            blocks_free: 40,
            blocks_available: 30,
            files: 50,
            files_free: 45,
        };
        assert_eq!(stats.capacity_bytes(), 409_600);
        assert_eq!(stats.available_bytes(), 122_880);
        assert_eq!(stats.used_bytes(), 245_760);
        assert_eq!(stats.used_inodes(), 5);
    }
}
