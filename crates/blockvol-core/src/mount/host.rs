//! Host `mount(2)` invocation.

use std::path::Path;

use blockvol_common::error::{BlockvolError, Result};
use nix::mount::{MsFlags, mount};

use super::options::{ParsedOptions, parse_options};

/// One `mount(2)` call issued for a mount request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountCall {
    /// The main call, attaching `device` to the target.
    Mount,
    /// Change the propagation type of the target.
    Propagate(MsFlags),
    /// Remount the target with the given flags.
    Remount(MsFlags),
}

/// The ordered `mount(2)` calls needed to satisfy `parsed`.
///
/// A pure remount without data has nothing to attach, so the main call is
/// skipped.
fn mount_calls(parsed: &ParsedOptions) -> Vec<MountCall> {
    let mut calls = Vec::with_capacity(3);
    if !parsed.is_remount() || !parsed.data.is_empty() {
        calls.push(MountCall::Mount);
    }
    if !parsed.propagation.is_empty() {
        calls.push(MountCall::Propagate(parsed.propagation));
    }
    if parsed.is_readonly_bind() {
        calls.push(MountCall::Remount(parsed.flags | MsFlags::MS_REMOUNT));
    }
    calls
}

/// Mounts `device` on `target` as `fs_type` with the given option list.
///
/// Propagation options (`shared`, `rprivate`, ...) are applied by a second
/// call on the target, and a read-only bind is completed by a remount, since
/// the kernel ignores both on the initial call. A single attempt is made.
///
/// # Errors
///
/// Returns [`BlockvolError::MountFailed`] carrying the kernel errno if any
/// of the `mount(2)` calls fails.
pub fn mount_device(device: &Path, target: &Path, fs_type: &str, options: &[String]) -> Result<()> {
    let parsed = parse_options(options);
    let failed = |errno: nix::errno::Errno| BlockvolError::MountFailed {
        device: device.to_path_buf(),
        target: target.to_path_buf(),
        fs_type: fs_type.to_string(),
        source: errno.into(),
    };

    tracing::debug!(
        device = %device.display(),
        target = %target.display(),
        fs_type,
        flags = ?parsed.flags,
        data = %parsed.data,
        "mount(2)"
    );

    for call in mount_calls(&parsed) {
        match call {
            MountCall::Mount => {
                let data = (!parsed.data.is_empty()).then_some(parsed.data.as_str());
                mount(Some(device), target, Some(fs_type), parsed.flags, data).map_err(failed)?;
            }
            MountCall::Propagate(flags) | MountCall::Remount(flags) => {
                mount(None::<&str>, target, None::<&str>, flags, None::<&str>).map_err(failed)?;
            }
        }
    }

    tracing::info!(device = %device.display(), target = %target.display(), fs_type, "mounted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls(options: &[&str]) -> Vec<MountCall> {
        let options: Vec<String> = options.iter().map(|s| (*s).to_string()).collect();
        mount_calls(&parse_options(&options))
    }

    #[test]
    fn plain_mount_is_a_single_call() {
        assert_eq!(calls(&[]), vec![MountCall::Mount]);
        assert_eq!(calls(&["noatime", "discard"]), vec![MountCall::Mount]);
    }

    #[test]
    fn propagation_gets_its_own_call() {
        assert_eq!(
            calls(&["discard", "shared"]),
            vec![MountCall::Mount, MountCall::Propagate(MsFlags::MS_SHARED)]
        );
        assert_eq!(
            calls(&["rprivate"]),
            vec![
                MountCall::Mount,
                MountCall::Propagate(MsFlags::MS_PRIVATE | MsFlags::MS_REC)
            ]
        );
    }

    #[test]
    fn readonly_bind_is_completed_by_remount() {
        assert_eq!(
            calls(&["bind", "ro"]),
            vec![
                MountCall::Mount,
                MountCall::Remount(MsFlags::MS_BIND | MsFlags::MS_RDONLY | MsFlags::MS_REMOUNT)
            ]
        );
    }

    #[test]
    fn remount_without_data_skips_main_call() {
        assert!(calls(&["remount"]).is_empty());
        assert_eq!(
            calls(&["remount", "rshared"]),
            vec![MountCall::Propagate(MsFlags::MS_SHARED | MsFlags::MS_REC)]
        );
        assert_eq!(calls(&["remount", "errors=remount-ro"]), vec![MountCall::Mount]);
    }

    #[test]
    fn missing_target_fails_with_enoent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("absent");

        let err = mount_device(
            Path::new("/dev/blockvol-none"),
            &target,
            "ext4",
            &["shared".to_string()],
        )
        .expect_err("mount onto a missing target must fail");

        match &err {
            BlockvolError::MountFailed {
                device,
                target: failed_target,
                fs_type,
                ..
            } => {
                assert_eq!(device, Path::new("/dev/blockvol-none"));
                assert_eq!(failed_target, &target);
                assert_eq!(fs_type, "ext4");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.mount_errno(), Some(nix::errno::Errno::ENOENT as i32));
        assert!(!target.exists());
    }
}
