//! Capturing live paths into a snapshot directory and restoring them.
//!
//! Inside a snapshot every captured path lives at its home-relative
//! location. Symlinks are never stored as links: each one becomes a
//! `<name>.link` stub file holding the raw link target.
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::{Manifest, is_manifest};
use crate::error::{IoContext as _, Result, SyncError};
use crate::sync::fs::{ensure_parent_dir, read_link_bytes, remove_existing, symlink_from_bytes};

/// Suffix of the stub files that stand in for symlinks.
pub const LINK_SUFFIX: &str = ".link";

/// Location of `path` relative to `home`.
///
/// `path` is normalized lexically first, so the result never contains `..`
/// and always stays below whatever it is joined onto. Paths outside `home`
/// keep all of their normal components, so `/etc/hosts` maps to
/// `etc/hosts` and `~/../x` maps to `<home parent>/x` without the root.
pub(super) fn relative_to_home(path: &Path, home: &Path) -> PathBuf {
    let path = normalize(path);
    let home = normalize(home);
    let rel = path.strip_prefix(&home).unwrap_or(&path);
    rel.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn link_stub(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(LINK_SUFFIX);
    PathBuf::from(name)
}

/// Copy `path` into `snapshot` at its home-relative location.
///
/// Returns `false` without error when `path` has vanished or is the home
/// directory or one of its ancestors.
pub(super) fn capture(path: &Path, snapshot: &Path, home: &Path) -> Result<bool> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        tracing::debug!("{} vanished before backup, skipping", path.display());
        return Ok(false);
    };
    let rel = relative_to_home(path, home);
    if rel.as_os_str().is_empty() || normalize(home).starts_with(normalize(path)) {
        tracing::warn!("refusing to back up {} as a whole", path.display());
        return Ok(false);
    }
    let target = snapshot.join(&rel);
    if !target.starts_with(snapshot) {
        return Err(SyncError::Configuration(format!(
            "{} escapes the backup snapshot",
            path.display()
        )));
    }
    ensure_parent_dir(&target)?;
    copy_entry(path, &target, &meta)?;
    Ok(true)
}

fn copy_entry(src: &Path, dest: &Path, meta: &fs::Metadata) -> Result<()> {
    if meta.is_symlink() {
        let stub = link_stub(dest);
        fs::write(&stub, read_link_bytes(src)?).io_context("write link stub", &stub)?;
    } else if meta.is_dir() {
        fs::create_dir_all(dest).io_context("create directory", dest)?;
        for entry in fs::read_dir(src).io_context("read directory", src)? {
            let entry = entry.io_context("read entry in", src)?;
            let child = entry.path();
            let child_meta = fs::symlink_metadata(&child).io_context("stat", &child)?;
            copy_entry(&child, &dest.join(entry.file_name()), &child_meta)?;
        }
        fs::set_permissions(dest, meta.permissions()).io_context("set permissions on", dest)?;
    } else {
        fs::copy(src, dest).io_context("copy file to", dest)?;
    }
    Ok(())
}

/// Maps entries of a snapshot back to the live paths they were taken from.
#[derive(Debug)]
struct Origins {
    home: PathBuf,
    /// Location inside the snapshot paired with the normalized live path.
    captured: Vec<(PathBuf, PathBuf)>,
}

impl Origins {
    fn new(files: &[PathBuf], home: &Path) -> Self {
        let captured = files
            .iter()
            .map(|file| (relative_to_home(file, home), normalize(file)))
            .filter(|(stored, _)| !stored.as_os_str().is_empty())
            .collect();
        Self {
            home: home.to_path_buf(),
            captured,
        }
    }

    /// Live location of the snapshot entry at `rel`.
    ///
    /// Entries inside a captured path map below it and directories above one
    /// map to the matching ancestor. Anything the manifest does not cover
    /// lands at its home-relative location.
    fn locate(&self, rel: &Path) -> PathBuf {
        for (stored, live) in &self.captured {
            if let Ok(rest) = rel.strip_prefix(stored) {
                if rest.as_os_str().is_empty() {
                    return live.clone();
                }
                return live.join(rest);
            }
            if let Ok(rest) = stored.strip_prefix(rel) {
                let mut ancestor = live.clone();
                for _ in rest.components() {
                    ancestor.pop();
                }
                return ancestor;
            }
        }
        self.home.join(rel)
    }
}

/// Restore every entry of `snapshot` to the place it was captured from,
/// returning the number of entries written.
///
/// Link stubs become symlinks again, directories are created where absent,
/// and files overwrite whatever exists at their target. The manifests at the
/// snapshot root are skipped. Without a readable manifest every entry lands
/// at its home-relative location.
pub(super) fn restore(snapshot: &Path, home: &Path) -> Result<usize> {
    let files = match Manifest::read(snapshot) {
        Ok(manifest) => manifest.files,
        Err(e) => {
            tracing::debug!("restoring {} without a manifest: {e}", snapshot.display());
            Vec::new()
        }
    };
    let origins = Origins::new(&files, home);

    let mut restored = 0;
    for entry in WalkDir::new(snapshot).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| SyncError::Io {
            action: "walk",
            path: e.path().unwrap_or(snapshot).to_path_buf(),
            source: e.into(),
        })?;
        if entry.depth() == 1 && is_manifest(entry.file_name()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(snapshot) else {
            continue;
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let target = origins.locate(rel);
            if !target.exists() {
                fs::create_dir_all(&target).io_context("create directory", &target)?;
                let perms = entry
                    .metadata()
                    .map_err(|e| SyncError::Io {
                        action: "stat",
                        path: entry.path().to_path_buf(),
                        source: e.into(),
                    })?
                    .permissions();
                fs::set_permissions(&target, perms).io_context("set permissions on", &target)?;
            }
        } else if let Some(link_rel) = stub_target(rel) {
            let link = origins.locate(&link_rel);
            let bytes = fs::read(entry.path()).io_context("read link stub", entry.path())?;
            remove_existing(&link)?;
            ensure_parent_dir(&link)?;
            symlink_from_bytes(&bytes, &link)?;
            tracing::debug!("restored symlink {}", link.display());
        } else {
            let target = origins.locate(rel);
            remove_existing(&target)?;
            ensure_parent_dir(&target)?;
            fs::copy(entry.path(), &target).io_context("restore file to", &target)?;
            tracing::debug!("restored {}", target.display());
        }
        restored += 1;
    }
    Ok(restored)
}

/// If `path` names a link stub, return the path of the link it stands for.
fn stub_target(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let base = name.strip_suffix(LINK_SUFFIX)?;
    if base.is_empty() {
        return None;
    }
    Some(path.with_file_name(base))
}
