//! Consistent reads of kernel pseudo-files.
//!
//! Files such as `/proc/self/mountinfo` are generated on the fly and can
//! change while they are being read, yielding a torn view. The content is
//! accepted only once two consecutive reads return identical bytes.

use std::path::Path;

use blockvol_common::error::{BlockvolError, Result};

/// Reads `path` until two consecutive reads agree, at most `attempts` times
/// after the initial read.
///
/// # Errors
///
/// Returns [`BlockvolError::Io`] if a read fails, or
/// [`BlockvolError::InconsistentRead`] if the content never stabilizes.
pub fn consistent_read(path: &Path, attempts: usize) -> Result<Vec<u8>> {
    consistent_read_with(path, attempts, || std::fs::read(path))
}

/// Like [`consistent_read`], with the read itself supplied by the caller.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`BlockvolError::Io`] if `read` fails, or
/// [`BlockvolError::InconsistentRead`] if the content never stabilizes.
pub fn consistent_read_with<F>(path: &Path, attempts: usize, mut read: F) -> Result<Vec<u8>>
where
    F: FnMut() -> std::io::Result<Vec<u8>>,
{
    let io_err = |e: std::io::Error| BlockvolError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut previous = read().map_err(io_err)?;
    for attempt in 1..=attempts {
        let current = read().map_err(io_err)?;
        if current == previous {
            return Ok(current);
        }
        tracing::debug!(path = %path.display(), attempt, "content changed between reads, retrying");
        previous = current;
    }

    Err(BlockvolError::InconsistentRead {
        path: path.to_path_buf(),
        attempts,
    })
}
