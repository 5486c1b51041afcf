//! # blockvol-core
//!
//! Node-local disk management for attached cloud block volumes.
//!
//! This crate provides:
//! - **Device resolution**: volume identifier to a verified block device path.
//! - **Probing**: existing filesystem detection through `blkid`.
//! - **Format-and-mount**: idempotent mounting that formats a device only
//!   when it provably carries no filesystem.
//! - **Mount table inspection**: `/proc/self/mountinfo` parsing and
//!   shared-propagation verification.
//! - **Statistics**: `statfs(2)` capacity figures for a mounted path.
//!
//! Every query re-reads host state. Nothing here caches the mount table or
//! a volume-to-device mapping across calls.
//!
//! No operation takes a lock. Callers must serialize mutating operations on
//! the same volume, for example with [`lock::VolumeLocks`].

pub mod device;
pub mod lock;
pub mod manager;
pub mod mount;
pub mod probe;
pub mod statfs;
pub mod tools;

pub use manager::DiskManager;
pub use mount::MountRecord;
pub use tools::{DiskTools, SystemTools};
