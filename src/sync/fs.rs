//! File-system helpers shared by the copy engine and the backup store.
use std::fs;
use std::path::Path;

use crate::error::{IoContext as _, Result};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the directory
/// cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).io_context("create parent directory", parent)?;
    }
    Ok(())
}

/// Remove whatever exists at `path`: a file, a symlink (broken or not), or a
/// whole directory tree. Does nothing if `path` does not exist.
///
/// Symlinks are removed as links; their targets are never touched.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the path exists
/// but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    if meta.is_dir() {
        fs::remove_dir_all(path).io_context("remove existing directory", path)
    } else {
        fs::remove_file(path).io_context("remove existing", path)
    }
}

/// Returns `true` if anything (including a dangling symlink) exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Set the permission bits of `path` to exactly `mode`.
///
/// A no-op on platforms without Unix permissions.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the permissions
/// cannot be changed.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).io_context("chmod", path)
}

/// Set the permission bits of `path` to exactly `mode`.
///
/// A no-op on platforms without Unix permissions.
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Read the target of the symlink at `link` as raw bytes.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if `link` is not a
/// readable symlink.
pub fn read_link_bytes(link: &Path) -> Result<Vec<u8>> {
    let target = fs::read_link(link).io_context("read symlink", link)?;
    Ok(target.into_os_string().into_encoded_bytes())
}

/// Create a symlink at `link` pointing at the raw `target` bytes.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the symlink
/// cannot be created.
#[cfg(unix)]
pub fn symlink_from_bytes(target: &[u8], link: &Path) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt as _;
    std::os::unix::fs::symlink(OsStr::from_bytes(target), link).io_context("create symlink", link)
}

/// Create a symlink at `link` pointing at the raw `target` bytes.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the symlink
/// cannot be created.
#[cfg(windows)]
pub fn symlink_from_bytes(target: &[u8], link: &Path) -> Result<()> {
    let target = String::from_utf8_lossy(target).into_owned();
    std::os::windows::fs::symlink_file(target, link).io_context("create symlink", link)
}
