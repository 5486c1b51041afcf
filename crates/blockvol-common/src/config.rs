//! Configuration model for the disk layer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{BlockvolError, Result};

/// Host-specific settings for device resolution, probing, and mounting.
///
/// Every field has a default matching a standard Linux node, so a
/// configuration file only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Directory holding the stable device symlinks.
    pub by_id_dir: PathBuf,
    /// Prefix prepended to a volume identifier to form its symlink name.
    pub device_prefix: String,
    /// Filesystem type used when a caller passes an empty one.
    pub default_fs_type: String,
    /// Mount table file to parse.
    pub mountinfo_path: PathBuf,
    /// Maximum reads attempted to obtain a consistent mount table.
    pub mountinfo_read_attempts: usize,
    /// Name or path of the filesystem identification tool.
    pub blkid_binary: String,
    /// Prefix of the formatter binary; the filesystem type is appended.
    pub mkfs_prefix: String,
    /// Reserved-block percentage passed to the formatter as `-m`.
    pub reserved_blocks_percent: u8,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            by_id_dir: PathBuf::from(constants::DISK_BY_ID_DIR),
            device_prefix: constants::DEVICE_PREFIX.into(),
            default_fs_type: constants::DEFAULT_FS_TYPE.into(),
            mountinfo_path: PathBuf::from(constants::MOUNTINFO_PATH),
            mountinfo_read_attempts: constants::MOUNTINFO_READ_ATTEMPTS,
            blkid_binary: constants::BLKID_BINARY.into(),
            mkfs_prefix: constants::MKFS_PREFIX.into(),
            reserved_blocks_percent: constants::RESERVED_BLOCKS_PERCENT,
        }
    }
}

impl DiskConfig {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails [`DiskConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading disk configuration");
        let raw = std::fs::read_to_string(path).map_err(|e| BlockvolError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvolError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.default_fs_type.is_empty() {
            return Err(config_error("default_fs_type must not be empty"));
        }
        if self.by_id_dir.as_os_str().is_empty() {
            return Err(config_error("by_id_dir must not be empty"));
        }
        if self.mountinfo_read_attempts == 0 {
            return Err(config_error("mountinfo_read_attempts must be at least 1"));
        }
        if self.reserved_blocks_percent > 50 {
            return Err(config_error("reserved_blocks_percent must not exceed 50"));
        }
        Ok(())
    }

    /// Returns `fs_type`, or the configured default when it is empty.
    #[must_use]
    pub fn fs_type_or_default<'a>(&'a self, fs_type: &'a str) -> &'a str {
        if fs_type.is_empty() {
            &self.default_fs_type
        } else {
            fs_type
        }
    }
}

fn config_error(message: &str) -> BlockvolError {
    BlockvolError::Config {
        message: message.into(),
    }
}
