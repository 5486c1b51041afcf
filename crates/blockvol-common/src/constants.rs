//! System-wide constants and default paths.

/// Directory holding the stable per-identifier device symlinks.
pub const DISK_BY_ID_DIR: &str = "/dev/disk/by-id";

/// Vendor/product prefix prepended to a volume identifier to form its
/// symlink name under [`DISK_BY_ID_DIR`].
pub const DEVICE_PREFIX: &str = "scsi-0SCW_b_ssd_volume-";

/// Filesystem type used when the caller does not specify one.
pub const DEFAULT_FS_TYPE: &str = "ext4";

/// Per-process mount table exposed by the kernel.
pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Number of reads attempted before giving up on a consistent mount table.
pub const MOUNTINFO_READ_ATTEMPTS: usize = 3;

/// Minimum number of whitespace-separated fields on a mount table line.
pub const MOUNTINFO_MIN_FIELDS: usize = 10;

/// Separator between optional fields and the trailing triple.
pub const MOUNTINFO_SEPARATOR: &str = "-";

/// Optional-field tag announcing shared mount propagation.
pub const SHARED_TAG: &str = "shared";

/// Filesystem identification tool.
pub const BLKID_BINARY: &str = "blkid";

/// `blkid` exit status meaning no identifiable filesystem was found.
pub const BLKID_EXIT_UNIDENTIFIED: i32 = 2;

/// Prefix of the per-filesystem formatter binary (`mkfs.ext4`, `mkfs.xfs`, ...).
pub const MKFS_PREFIX: &str = "mkfs.";

/// Reserved-block percentage passed to the formatter.
pub const RESERVED_BLOCKS_PERCENT: u8 = 0;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "bvol";
