//! Copy engine: materializes a source file or directory at its destination.
//!
//! Directories are merged recursively: entries under the destination that
//! have no counterpart in the source are left alone. Source symlinks are
//! followed, so their contents are materialized rather than the link itself.
use std::fs;
use std::path::Path;

use super::fs::{ensure_parent_dir, remove_existing, set_mode};
use crate::error::{IoContext as _, Result, SyncError};

/// Options controlling how the [`CopyEngine`] writes destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Create missing parent directories of the destination.
    pub create_dirs: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self { create_dirs: true }
    }
}

/// Copies resolved mapping sources to their destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyEngine {
    options: CopyOptions,
}

impl CopyEngine {
    /// Create an engine with the given options.
    #[must_use]
    pub const fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    /// Copy `source` to `dest`, returning the number of regular files written.
    ///
    /// A file source replaces whatever exists at `dest`, including a symlink
    /// (the link is replaced, its target untouched). A directory source is
    /// merged into `dest`. When `mode` is given it is applied to `dest`
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] if `source` does not exist, or
    /// [`SyncError::Io`] for any failure while writing.
    pub fn copy(&self, source: &Path, dest: &Path, mode: Option<u32>) -> Result<usize> {
        let meta = match fs::metadata(source) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SyncError::NotFound(source.to_path_buf()));
            }
            Err(e) => {
                return Err(SyncError::Io {
                    action: "stat",
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };

        if self.options.create_dirs {
            ensure_parent_dir(dest)?;
        }

        let written = if meta.is_dir() {
            tracing::debug!("merging {} into {}", source.display(), dest.display());
            merge_dir(source, dest)?
        } else {
            replace_file(source, dest)?;
            1
        };

        if let Some(mode) = mode {
            set_mode(dest, mode)?;
        }
        Ok(written)
    }

    /// Add execute permission for owner, group, and others to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the permissions cannot be read or written.
    #[cfg(unix)]
    pub fn make_executable(&self, dest: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt as _;
        let mode = fs::metadata(dest)
            .io_context("stat", dest)?
            .permissions()
            .mode();
        set_mode(dest, mode | 0o111)
    }

    /// Add execute permission to `dest`. A no-op on this platform.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if `dest` does not exist.
    #[cfg(not(unix))]
    pub fn make_executable(&self, dest: &Path) -> Result<()> {
        fs::metadata(dest).io_context("stat", dest).map(|_| ())
    }
}

/// Replace whatever exists at `dest` with a copy of the file at `src`.
fn replace_file(src: &Path, dest: &Path) -> Result<()> {
    remove_existing(dest)?;
    fs::copy(src, dest).io_context("copy file to", dest)?;
    Ok(())
}

/// Merge the directory `src` into `dest`, returning the number of files written.
///
/// A directory created here takes the source directory's permission bits
/// once its contents are in place.
fn merge_dir(src: &Path, dest: &Path) -> Result<usize> {
    let created = if fs::symlink_metadata(dest).is_ok_and(|m| m.is_dir()) {
        false
    } else {
        remove_existing(dest)?;
        fs::create_dir_all(dest).io_context("create directory", dest)?;
        true
    };

    let mut written = 0;
    for entry in fs::read_dir(src).io_context("read directory", src)? {
        let entry = entry.io_context("read entry in", src)?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if fs::metadata(&src_path)
            .io_context("stat", &src_path)?
            .is_dir()
        {
            written += merge_dir(&src_path, &dest_path)?;
        } else {
            replace_file(&src_path, &dest_path)?;
            written += 1;
        }
    }

    if created {
        let perms = fs::metadata(src).io_context("stat", src)?.permissions();
        fs::set_permissions(dest, perms).io_context("set permissions on", dest)?;
    }
    Ok(written)
}
