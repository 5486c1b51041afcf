//! Filesystem detection from `blkid` results.
//!
//! `blkid -p -s TYPE -s PTTYPE -o export <device>` prints `KEY=value`
//! lines. Exit status 2 means nothing identifiable was found on the device,
//! which is how an unformatted volume shows up. That case yields an empty
//! type, never an error, so callers can tell "needs formatting" apart from
//! a broken tool or device.

use std::path::Path;

use blockvol_common::constants::BLKID_EXIT_UNIDENTIFIED;
use blockvol_common::error::{BlockvolError, Result};

/// Arguments passed to `blkid` ahead of the device path.
pub const BLKID_ARGS: &[&str] = &["-p", "-s", "TYPE", "-s", "PTTYPE", "-o", "export"];

/// Interprets a finished `blkid` run.
///
/// `code` is the exit status, `None` if the process was killed by a signal.
///
/// # Errors
///
/// Returns [`BlockvolError::ProbeFailed`] for any unsuccessful exit other
/// than [`BLKID_EXIT_UNIDENTIFIED`].
pub fn interpret_blkid(device: &Path, code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Result<String> {
    match code {
        Some(0) => {
            let fs_type = parse_export(&String::from_utf8_lossy(stdout));
            tracing::debug!(device = %device.display(), fs_type = %fs_type, "probed device");
            Ok(fs_type)
        }
        Some(BLKID_EXIT_UNIDENTIFIED) => {
            tracing::debug!(device = %device.display(), "no identifiable filesystem");
            Ok(String::new())
        }
        Some(code) => Err(BlockvolError::ProbeFailed {
            device: device.to_path_buf(),
            message: format!(
                "blkid exited with status {code}: {}",
                String::from_utf8_lossy(stderr).trim()
            ),
        }),
        None => Err(BlockvolError::ProbeFailed {
            device: device.to_path_buf(),
            message: "blkid terminated by signal".into(),
        }),
    }
}

/// Returns the value of the first non-empty `TYPE=` line, or an empty
/// string if there is none.
///
/// `PTTYPE` is requested alongside `TYPE` but does not count as a
/// filesystem type.
#[must_use]
pub fn parse_export(output: &str) -> String {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, value)| *key == "TYPE" && !value.is_empty())
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: &str = "/dev/disk/by-id/scsi-0SCW_b_ssd_volume-abc";

    #[test]
    fn exit_two_is_unformatted_not_error() {
        let fs_type = interpret_blkid(Path::new(DEVICE), Some(2), b"", b"").expect("no error");
        assert_eq!(fs_type, "");
    }

    #[test]
    fn successful_probe_returns_type() {
        let out = b"DEVNAME=/dev/sdb\nTYPE=ext4\n";
        let fs_type = interpret_blkid(Path::new(DEVICE), Some(0), out, b"").expect("ok");
        assert_eq!(fs_type, "ext4");
    }

    #[test]
    fn other_exit_codes_fail() {
        let err = interpret_blkid(Path::new(DEVICE), Some(4), b"", b"usage error\n")
            .expect_err("should fail");
        match err {
            BlockvolError::ProbeFailed { message, .. } => {
                assert!(message.contains("status 4"), "got: {message}");
                assert!(message.contains("usage error"), "got: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn signal_termination_fails() {
        let err = interpret_blkid(Path::new(DEVICE), None, b"", b"").expect_err("should fail");
        assert!(matches!(err, BlockvolError::ProbeFailed { .. }));
    }

    #[test]
    fn partition_table_only_is_empty_type() {
        assert_eq!(parse_export("DEVNAME=/dev/sdb\nPTTYPE=gpt\n"), "");
    }

    #[test]
    fn empty_type_value_is_skipped() {
        assert_eq!(parse_export("TYPE=\nTYPE=xfs\n"), "xfs");
    }

    #[test]
    fn no_output_is_empty_type() {
        assert_eq!(parse_export(""), "");
    }

    #[test]
    fn value_containing_equals_is_kept_whole() {
        assert_eq!(parse_export("TYPE=a=b\n"), "a=b");
    }
}
