//! File system utilities.

use crate::Result;
use std::io::Write;
use std::path::Path;

/// Create a directory and all parent directories.
pub fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file so readers only ever see the old or the new content.
///
/// Content goes to a temp file in the same directory, then is renamed over
/// the target.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Remove a file, treating a missing file as already removed.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Check whether a directory accepts writes.
pub fn is_writable_dir(path: &Path) -> bool {
    if create_dir_all(path).is_err() {
        return false;
    }
    tempfile::NamedTempFile::new_in(path).is_ok()
}
