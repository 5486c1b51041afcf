//! Mount table inspection and host mount calls.
//!
//! Reads `/proc/self/mountinfo` with a torn-read tolerant strategy, parses
//! it into [`MountRecord`] values, verifies shared propagation, and issues
//! `mount(2)` with docker-style option strings.

#[cfg(target_os = "linux")]
pub mod host;
#[cfg(target_os = "linux")]
pub mod options;
pub mod read;
pub mod shared;
pub mod table;

pub use read::{consistent_read, consistent_read_with};
pub use table::{MountRecord, find_mount, parse_line};
