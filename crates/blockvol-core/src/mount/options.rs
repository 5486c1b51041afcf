//! Translation of `mount(8)`-style option lists into `mount(2)` arguments.

use nix::mount::MsFlags;

/// Kernel arguments derived from an option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptions {
    /// Flags for the initial `mount(2)` call.
    pub flags: MsFlags,
    /// Propagation flags, applied by a second call on the target.
    pub propagation: MsFlags,
    /// Comma-joined filesystem-specific options passed as `data`.
    pub data: String,
}

impl ParsedOptions {
    /// Returns `true` for a remount request.
    #[must_use]
    pub const fn is_remount(&self) -> bool {
        self.flags.contains(MsFlags::MS_REMOUNT)
    }

    /// Returns `true` for a read-only bind mount, which the kernel only
    /// honours on a follow-up remount.
    #[must_use]
    pub const fn is_readonly_bind(&self) -> bool {
        self.flags
            .contains(MsFlags::MS_BIND.union(MsFlags::MS_RDONLY))
    }
}

/// `(option, clear, flag)`: `clear` means the option removes `flag`.
const FLAG_OPTIONS: &[(&str, bool, MsFlags)] = &[
    ("defaults", false, MsFlags::empty()),
    ("ro", false, MsFlags::MS_RDONLY),
    ("rw", true, MsFlags::MS_RDONLY),
    ("suid", true, MsFlags::MS_NOSUID),
    ("nosuid", false, MsFlags::MS_NOSUID),
    ("dev", true, MsFlags::MS_NODEV),
    ("nodev", false, MsFlags::MS_NODEV),
    ("exec", true, MsFlags::MS_NOEXEC),
    ("noexec", false, MsFlags::MS_NOEXEC),
    ("sync", false, MsFlags::MS_SYNCHRONOUS),
    ("async", true, MsFlags::MS_SYNCHRONOUS),
    ("dirsync", false, MsFlags::MS_DIRSYNC),
    ("remount", false, MsFlags::MS_REMOUNT),
    ("mand", false, MsFlags::MS_MANDLOCK),
    ("nomand", true, MsFlags::MS_MANDLOCK),
    ("atime", true, MsFlags::MS_NOATIME),
    ("noatime", false, MsFlags::MS_NOATIME),
    ("diratime", true, MsFlags::MS_NODIRATIME),
    ("nodiratime", false, MsFlags::MS_NODIRATIME),
    ("bind", false, MsFlags::MS_BIND),
    ("rbind", false, MsFlags::MS_BIND.union(MsFlags::MS_REC)),
    ("relatime", false, MsFlags::MS_RELATIME),
    ("norelatime", true, MsFlags::MS_RELATIME),
    ("strictatime", false, MsFlags::MS_STRICTATIME),
    ("nostrictatime", true, MsFlags::MS_STRICTATIME),
];

const PROPAGATION_OPTIONS: &[(&str, MsFlags)] = &[
    ("shared", MsFlags::MS_SHARED),
    ("rshared", MsFlags::MS_SHARED.union(MsFlags::MS_REC)),
    ("private", MsFlags::MS_PRIVATE),
    ("rprivate", MsFlags::MS_PRIVATE.union(MsFlags::MS_REC)),
    ("slave", MsFlags::MS_SLAVE),
    ("rslave", MsFlags::MS_SLAVE.union(MsFlags::MS_REC)),
    ("unbindable", MsFlags::MS_UNBINDABLE),
    ("runbindable", MsFlags::MS_UNBINDABLE.union(MsFlags::MS_REC)),
];

/// Splits `options` into kernel flags, propagation flags, and data.
///
/// Each entry may itself be a comma-separated list. Unknown options are
/// forwarded to the filesystem untouched, in order.
#[must_use]
pub fn parse_options(options: &[String]) -> ParsedOptions {
    let mut flags = MsFlags::empty();
    let mut propagation = MsFlags::empty();
    let mut data = Vec::new();

    for option in options
        .iter()
        .flat_map(|entry| entry.split(','))
        .filter(|option| !option.is_empty())
    {
        if let Some((_, clear, flag)) = FLAG_OPTIONS.iter().find(|(name, ..)| *name == option) {
            if *clear {
                flags.remove(*flag);
            } else {
                flags.insert(*flag);
            }
        } else if let Some((_, flag)) = PROPAGATION_OPTIONS.iter().find(|(name, _)| *name == option)
        {
            propagation.insert(*flag);
        } else {
            data.push(option);
        }
    }

    ParsedOptions {
        flags,
        propagation,
        data: data.join(","),
    }
}
