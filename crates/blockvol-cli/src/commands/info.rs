//! `bvol mount-info` — Show the mount table record for a target path.

use std::path::PathBuf;

use blockvol_common::constants::SHARED_TAG;
use blockvol_core::{DiskManager, MountRecord};
use clap::Args;

/// Arguments for the `mount-info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Mount point to look up.
    pub target: PathBuf,
}

/// Executes the `mount-info` command.
///
/// # Errors
///
/// Returns an error if the mount table cannot be read or parsed.
pub fn execute(args: &InfoArgs, manager: &DiskManager, json: bool) -> anyhow::Result<()> {
    let record = manager.mount_info(&args.target)?;

    if json {
        return crate::output::print_json(&record);
    }

    let Some(record) = record else {
        println!("{} is not mounted.", args.target.display());
        return Ok(());
    };

    println!("{:<16} {}", "MOUNT ID", record.id);
    println!("{:<16} {}", "PARENT ID", record.parent_id);
    println!("{:<16} {}", "DEVICE", record.major_minor);
    println!("{:<16} {}", "SOURCE", record.source);
    println!("{:<16} {}", "FS TYPE", record.fs_type);
    println!("{:<16} {}", "ROOT", record.root.display());
    println!("{:<16} {}", "OPTIONS", record.mount_options.join(","));
    println!("{:<16} {}", "SUPER OPTIONS", record.super_options.join(","));
    println!("{:<16} {}", "PROPAGATION", propagation(&record));
    Ok(())
}

/// Describes the propagation type of `record` from its optional fields.
fn propagation(record: &MountRecord) -> String {
    let mut parts = Vec::new();
    if let Some(group) = record.optional_field(SHARED_TAG) {
        parts.push(format!("shared (peer group {group})"));
    }
    if let Some(master) = record.optional_field("master") {
        parts.push(format!("slave (master {master})"));
    }
    if record.optional_field("unbindable").is_some() {
        parts.push("unbindable".to_string());
    }
    if parts.is_empty() {
        return "private".to_string();
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use blockvol_core::mount::parse_line;

    use super::*;

    fn describe(line: &str) -> String {
        propagation(&parse_line(line).expect("valid line"))
    }

    #[test]
    fn shared_peer_group_is_reported() {
        assert_eq!(
            describe("96 25 8:16 / /mnt/data rw shared:4 - ext4 /dev/sdb rw"),
            "shared (peer group 4)"
        );
    }

    #[test]
    fn shared_and_slave_are_both_reported() {
        assert_eq!(
            describe("96 25 8:16 / /mnt/data rw shared:4 master:7 - ext4 /dev/sdb rw"),
            "shared (peer group 4), slave (master 7)"
        );
    }

    #[test]
    fn no_optional_fields_is_private() {
        assert_eq!(
            describe("104 25 0:48 / /mnt/private rw - tmpfs tmpfs rw"),
            "private"
        );
    }
}
