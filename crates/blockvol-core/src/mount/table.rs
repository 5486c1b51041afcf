//! Parser for the kernel's per-process mount table.
//!
//! Each line of `/proc/<pid>/mountinfo` has the layout (see `proc(5)`):
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)    (10)         (11)
//! ```
//!
//! Field (7) is zero or more optional `tag[:value]` fields terminated by the
//! literal `-` separator (8). The three fields after the separator are the
//! filesystem type, mount source, and super-block options.

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use blockvol_common::constants::{MOUNTINFO_MIN_FIELDS, MOUNTINFO_SEPARATOR, SHARED_TAG};
use blockvol_common::error::{BlockvolError, Result};
use serde::Serialize;

/// One parsed line of the mount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountRecord {
    /// Unique ID for the mount (may be reused after unmount).
    pub id: u32,
    /// ID of the parent mount, or of itself at the root of the namespace tree.
    pub parent_id: u32,
    /// `major:minor` of the backing device (`st_dev`).
    pub major_minor: String,
    /// Root of the subtree of the filesystem exposed at this mount.
    pub root: PathBuf,
    /// Filesystem-specific mount source, e.g. a device path or `tmpfs`.
    pub source: String,
    /// Mount point, byte for byte as the kernel reports it.
    pub mount_point: PathBuf,
    /// Optional `tag[:value]` fields, in table order.
    pub optional_fields: Vec<String>,
    /// Filesystem type, in the form `type[.subtype]`.
    pub fs_type: String,
    /// Per-mount options.
    pub mount_options: Vec<String>,
    /// Per-superblock options.
    pub super_options: Vec<String>,
}

impl MountRecord {
    /// Returns `true` if an optional field carries the `shared` tag.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.optional_field(SHARED_TAG).is_some()
    }

    /// Returns the value of the first optional field tagged `tag`, if any.
    #[must_use]
    pub fn optional_field(&self, tag: &str) -> Option<&str> {
        self.optional_fields.iter().find_map(|field| {
            let (name, value) = field.split_once(':').unwrap_or((field.as_str(), ""));
            (name == tag).then_some(value)
        })
    }
}

/// Finds the record whose mount point is `target`.
///
/// The table is scanned as raw bytes, so mount points that are not valid
/// UTF-8 still compare exactly. Lines are scanned in order and the first
/// match wins. Every line up to the match must carry at least ten fields.
/// `Ok(None)` means the target is not mounted, which is an ordinary outcome.
///
/// # Errors
///
/// Returns [`BlockvolError::MalformedMountTable`] for a line that violates
/// the field layout.
pub fn find_mount(content: &[u8], target: &Path) -> Result<Option<MountRecord>> {
    for line in content.split(|byte| *byte == b'\n') {
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line)?;
        if OsStr::from_bytes(&unescape(fields[4])) != target.as_os_str() {
            continue;
        }
        tracing::trace!(line = %String::from_utf8_lossy(line), "mount table line matches target");
        return parse_fields(line, &fields).map(Some);
    }
    Ok(None)
}

/// Parses a single mount table line.
///
/// # Errors
///
/// Returns [`BlockvolError::MalformedMountTable`] if the line has fewer than
/// ten fields, non-numeric mount IDs, or fewer than three fields after the
/// separator.
pub fn parse_line(line: &str) -> Result<MountRecord> {
    let line = line.as_bytes();
    parse_fields(line, &split_fields(line)?)
}

fn split_fields(line: &[u8]) -> Result<Vec<&[u8]>> {
    let fields: Vec<&[u8]> = line
        .split(u8::is_ascii_whitespace)
        .filter(|field| !field.is_empty())
        .collect();
    if fields.len() < MOUNTINFO_MIN_FIELDS {
        return Err(malformed(
            line,
            format!(
                "expected at least {MOUNTINFO_MIN_FIELDS} fields, got {}",
                fields.len()
            ),
        ));
    }
    Ok(fields)
}

fn parse_fields(line: &[u8], fields: &[&[u8]]) -> Result<MountRecord> {
    let id = parse_id(line, fields[0], "mount id")?;
    let parent_id = parse_id(line, fields[1], "parent id")?;

    let optional_fields: Vec<String> = fields[6..]
        .iter()
        .take_while(|field| **field != MOUNTINFO_SEPARATOR.as_bytes())
        .map(|field| text(field))
        .collect();

    let trailing = &fields[6 + optional_fields.len()..];
    let trailing = trailing.get(1..).unwrap_or_default();
    let [fs_type, source, super_options, ..] = trailing else {
        return Err(malformed(
            line,
            format!(
                "expected 3 fields after separator, got {}",
                trailing.len()
            ),
        ));
    };

    Ok(MountRecord {
        id,
        parent_id,
        major_minor: text(fields[2]),
        root: path(fields[3]),
        source: text(&unescape(source)),
        mount_point: path(fields[4]),
        optional_fields,
        fs_type: text(fs_type),
        mount_options: split_options(fields[5]),
        super_options: split_options(super_options),
    })
}

fn parse_id(line: &[u8], field: &[u8], what: &str) -> Result<u32> {
    let field = text(field);
    field
        .parse()
        .map_err(|e| malformed(line, format!("invalid {what} {field:?}: {e}")))
}

fn split_options(field: &[u8]) -> Vec<String> {
    field.split(|byte| *byte == b',').map(text).collect()
}

fn text(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

fn path(field: &[u8]) -> PathBuf {
    PathBuf::from(OsString::from_vec(unescape(field)))
}

/// Decodes the octal escapes (`\040` for space, ...) the kernel applies to
/// paths in the mount table.
fn unescape(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] == b'\\' {
            let decoded = field
                .get(i + 1..i + 4)
                .and_then(|octal| std::str::from_utf8(octal).ok())
                .and_then(|octal| u8::from_str_radix(octal, 8).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(field[i]);
        i += 1;
    }
    out
}

fn malformed(line: &[u8], reason: String) -> BlockvolError {
    BlockvolError::MalformedMountTable {
        line: text(line),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
22 1 0:21 / /proc rw,nosuid,nodev,noexec,relatime shared:5 - proc proc rw
25 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro
96 25 8:16 / /mnt/data rw,relatime shared:1 master:7 - ext4 /dev/sdb rw,data=ordered
104 25 0:48 / /mnt/private rw,relatime - tmpfs tmpfs rw,size=1024k
";

    #[test]
    fn finds_matching_line() {
        let record = find_mount(TABLE.as_bytes(), Path::new("/mnt/data"))
            .expect("should parse")
            .expect("should find /mnt/data");
        assert_eq!(record.id, 96);
        assert_eq!(record.parent_id, 25);
        assert_eq!(record.major_minor, "8:16");
        assert_eq!(record.root, PathBuf::from("/"));
        assert_eq!(record.mount_point, PathBuf::from("/mnt/data"));
        assert_eq!(record.mount_options, vec!["rw", "relatime"]);
        assert_eq!(record.optional_fields, vec!["shared:1", "master:7"]);
        assert_eq!(record.fs_type, "ext4");
        assert_eq!(record.source, "/dev/sdb");
        assert_eq!(record.super_options, vec!["rw", "data=ordered"]);
    }

    #[test]
    fn absent_target_is_not_an_error() {
        let record = find_mount(TABLE.as_bytes(), Path::new("/mnt/missing")).expect("should parse");
        assert!(record.is_none());
    }

    #[test]
    fn empty_table_is_not_an_error() {
        assert!(find_mount(b"", Path::new("/")).expect("should parse").is_none());
    }

    #[test]
    fn first_match_wins() {
        let table = "\
30 25 8:16 / /mnt/data rw - ext4 /dev/sdb rw
31 30 8:32 / /mnt/data rw shared:3 - xfs /dev/sdc rw
";
        let record = find_mount(table.as_bytes(), Path::new("/mnt/data"))
            .expect("should parse")
            .expect("should find");
        assert_eq!(record.id, 30);
        assert_eq!(record.source, "/dev/sdb");
    }

    #[test]
    fn no_optional_fields() {
        let record = find_mount(TABLE.as_bytes(), Path::new("/mnt/private"))
            .expect("should parse")
            .expect("should find");
        assert!(record.optional_fields.is_empty());
        assert_eq!(record.fs_type, "tmpfs");
        assert_eq!(record.source, "tmpfs");
        assert!(!record.is_shared());
    }

    #[test]
    fn optional_fields_stop_at_first_separator() {
        let line = "40 25 8:16 / /mnt/odd rw shared:2 - - ext4 /dev/sdd rw";
        let record = parse_line(line).expect("should parse");
        assert_eq!(record.optional_fields, vec!["shared:2"]);
        assert_eq!(record.fs_type, "-");
        assert_eq!(record.source, "ext4");
        assert_eq!(record.super_options, vec!["/dev/sdd"]);
    }

    #[test]
    fn short_line_is_malformed_even_before_match() {
        let table = "\
22 1 0:21 / /proc rw - proc proc
96 25 8:16 / /mnt/data rw shared:1 - ext4 /dev/sdb rw
";
        let err = find_mount(table.as_bytes(), Path::new("/mnt/data")).expect_err("should fail");
        match err {
            BlockvolError::MalformedMountTable { line, reason } => {
                assert!(line.contains("/proc"), "got: {line}");
                assert!(reason.contains("at least 10"), "got: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_separator_is_malformed() {
        let line = "96 25 8:16 / /mnt/data rw shared:1 master:7 ext4 /dev/sdb rw";
        let err = find_mount(line.as_bytes(), Path::new("/mnt/data")).expect_err("should fail");
        assert!(matches!(err, BlockvolError::MalformedMountTable { .. }));
    }

    #[test]
    fn fewer_than_three_trailing_fields_is_malformed() {
        let line = "96 25 8:16 / /mnt/data rw shared:1 master:7 opt:1 - ext4 /dev/sdb";
        let err = parse_line(line).expect_err("should fail");
        match err {
            BlockvolError::MalformedMountTable { reason, .. } => {
                assert!(reason.contains("got 2"), "got: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_id_is_malformed() {
        let line = "x 25 8:16 / /mnt/data rw shared:1 - ext4 /dev/sdb rw";
        let err = parse_line(line).expect_err("should fail");
        assert!(err.to_string().contains("mount id"), "got: {err}");
    }

    #[test]
    fn non_matching_lines_are_not_id_checked() {
        let table = "\
x y 0:21 / /proc rw shared:5 - proc proc rw
96 25 8:16 / /mnt/data rw shared:1 - ext4 /dev/sdb rw
";
        let record = find_mount(table.as_bytes(), Path::new("/mnt/data"))
            .expect("should parse")
            .expect("should find");
        assert_eq!(record.id, 96);
    }

    #[test]
    fn escaped_mount_point_matches_plain_target() {
        let line = "50 25 8:48 / /mnt/my\\040data rw shared:4 - ext4 /dev/sde rw";
        let record = find_mount(line.as_bytes(), Path::new("/mnt/my data"))
            .expect("should parse")
            .expect("should find");
        assert_eq!(record.mount_point, PathBuf::from("/mnt/my data"));
    }

    #[test]
    fn unescape_leaves_invalid_sequences_alone() {
        assert_eq!(unescape(b"a\\9zz"), b"a\\9zz");
        assert_eq!(unescape(b"tab\\011x"), b"tab\tx");
        assert_eq!(unescape(b"end\\"), b"end\\");
    }

    #[test]
    fn optional_field_lookup() {
        let record = find_mount(TABLE.as_bytes(), Path::new("/mnt/data"))
            .expect("should parse")
            .expect("should find");
        assert!(record.is_shared());
        assert_eq!(record.optional_field("master"), Some("7"));
        assert_eq!(record.optional_field("propagate_from"), None);
    }

    #[test]
    fn non_utf8_mount_point_matches_exactly() {
        let table = b"311 26 8:16 / /mnt/\xffdata rw shared:1 - ext4 /dev/sdb rw\n";
        let target = Path::new(OsStr::from_bytes(b"/mnt/\xffdata"));

        let record = find_mount(table, target)
            .expect("should parse")
            .expect("should find non-UTF-8 target");
        assert_eq!(record.mount_point.as_os_str().as_bytes(), b"/mnt/\xffdata");
        assert_eq!(record.source, "/dev/sdb");

        let lossy = Path::new("/mnt/\u{fffd}data");
        assert!(find_mount(table, lossy).expect("should parse").is_none());
    }

    #[test]
    fn escaped_non_utf8_byte_is_decoded() {
        let table = b"312 26 8:32 / /mnt/\\377vol rw shared:2 - xfs /dev/sdc rw\n";
        let target = Path::new(OsStr::from_bytes(b"/mnt/\xffvol"));
        let record = find_mount(table, target)
            .expect("should parse")
            .expect("should find");
        assert_eq!(record.id, 312);
    }
}
