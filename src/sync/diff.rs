//! Preview of what a copy would change at a destination.
//!
//! Line comparison is positional: line *n* of the source is compared with
//! line *n* of the destination, with no alignment. The change list is capped
//! at [`MAX_CHANGES`] entries, after which a single [`Change::Truncated`]
//! marker is appended.
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};
use walkdir::WalkDir;

use super::fs::entry_exists;
use crate::error::{IoContext as _, Result, SyncError};

/// Maximum number of changes recorded before truncating.
pub const MAX_CHANGES: usize = 20;

/// Overall classification of a source/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    /// Nothing exists at the destination.
    New,
    /// The destination differs from the source.
    Modified,
    /// The destination matches the source.
    Identical,
    /// The source does not exist.
    SourceMissing,
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "NEW",
            Self::Modified => "MODIFIED",
            Self::Identical => "IDENTICAL",
            Self::SourceMissing => "SOURCE MISSING",
        })
    }
}

/// One entry in a [`DiffResult`] change list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Line present in the destination that the copy would drop.
    Removed {
        /// 1-based line number.
        line: usize,
        /// Line text.
        text: String,
    },
    /// Line that the copy would write.
    Added {
        /// 1-based line number.
        line: usize,
        /// Line text.
        text: String,
    },
    /// Destination symlink points somewhere other than the source.
    Retarget {
        /// Current link target.
        from: PathBuf,
        /// Source path the copy would install.
        to: PathBuf,
    },
    /// File inside a source directory with no counterpart at the destination.
    NewFile(PathBuf),
    /// File inside a source directory whose destination contents differ.
    ModifiedFile(PathBuf),
    /// More changes exist than were recorded.
    Truncated,
}

impl Change {
    /// Returns `true` for entries describing content the copy adds.
    #[must_use]
    pub const fn is_addition(&self) -> bool {
        matches!(self, Self::Added { .. } | Self::NewFile(_))
    }

    /// Returns `true` for entries describing content the copy removes.
    #[must_use]
    pub const fn is_removal(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed { line, text } => write!(f, "- {line}: {text}"),
            Self::Added { line, text } => write!(f, "+ {line}: {text}"),
            Self::Retarget { from, to } => {
                write!(f, "symlink target: {} → {}", from.display(), to.display())
            }
            Self::NewFile(rel) => write!(f, "+ new file: {}", rel.display()),
            Self::ModifiedFile(rel) => write!(f, "~ modified: {}", rel.display()),
            Self::Truncated => write!(f, "... (showing first {MAX_CHANGES} changes)"),
        }
    }
}

/// Outcome of comparing a source with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Source path compared.
    pub source: PathBuf,
    /// Destination path compared.
    pub dest: PathBuf,
    /// Overall classification.
    pub status: DiffStatus,
    /// Ordered change list; empty unless `status` is [`DiffStatus::Modified`].
    pub changes: Vec<Change>,
}

impl DiffResult {
    fn without_changes(source: &Path, dest: &Path, status: DiffStatus) -> Self {
        Self {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            status,
            changes: Vec::new(),
        }
    }

    /// Returns `true` unless the destination already matches the source.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.status != DiffStatus::Identical
    }

    /// Render the result as console lines, colouring additions green and
    /// removals red.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let (src, dest) = (self.source.display(), self.dest.display());
        match self.status {
            DiffStatus::New => vec![format!("\x1b[32mNEW\x1b[0m: {src} → {dest}")],
            DiffStatus::Identical => vec![format!("\x1b[2mIDENTICAL\x1b[0m: {dest}")],
            DiffStatus::SourceMissing => vec![format!("\x1b[31mSOURCE MISSING\x1b[0m: {src}")],
            DiffStatus::Modified => {
                let mut lines = vec![format!("\x1b[33mMODIFIED\x1b[0m: {dest}")];
                lines.extend(self.changes.iter().map(|change| {
                    if change.is_addition() {
                        format!("    \x1b[32m{change}\x1b[0m")
                    } else if change.is_removal() {
                        format!("    \x1b[31m{change}\x1b[0m")
                    } else {
                        format!("    {change}")
                    }
                }));
                lines
            }
        }
    }
}

/// Accumulates changes up to [`MAX_CHANGES`].
#[derive(Default)]
struct ChangeLog {
    changes: Vec<Change>,
    truncated: bool,
}

impl ChangeLog {
    /// Record `change`; returns `false` once the cap is reached.
    fn push(&mut self, change: Change) -> bool {
        if self.changes.len() >= MAX_CHANGES {
            self.truncated = true;
            return false;
        }
        self.changes.push(change);
        true
    }

    fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn finish(mut self) -> Vec<Change> {
        if self.truncated {
            self.changes.push(Change::Truncated);
        }
        self.changes
    }
}

/// Compare `source` with `dest` without modifying either.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if either side exists but cannot be read.
pub fn compare(source: &Path, dest: &Path) -> Result<DiffResult> {
    let source_meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(DiffResult::without_changes(source, dest, DiffStatus::SourceMissing));
        }
        Err(e) => {
            return Err(SyncError::Io {
                action: "stat",
                path: source.to_path_buf(),
                source: e,
            });
        }
    };

    let Ok(dest_meta) = fs::symlink_metadata(dest) else {
        return Ok(DiffResult::without_changes(source, dest, DiffStatus::New));
    };

    if dest_meta.is_symlink() {
        let target = fs::read_link(dest).io_context("read symlink", dest)?;
        if target == source {
            return Ok(DiffResult::without_changes(source, dest, DiffStatus::Identical));
        }
        return Ok(DiffResult {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            status: DiffStatus::Modified,
            changes: vec![Change::Retarget {
                from: target,
                to: source.to_path_buf(),
            }],
        });
    }

    let changes = if source_meta.is_dir() {
        compare_dirs(source, dest)?
    } else {
        let src_text = read_text(source)?;
        // a directory in the way reads as empty
        let dest_text = if dest_meta.is_dir() {
            String::new()
        } else {
            read_text(dest)?
        };
        compare_lines(&src_text, &dest_text)
    };

    let status = if changes.is_empty() {
        DiffStatus::Identical
    } else {
        DiffStatus::Modified
    };
    Ok(DiffResult {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        status,
        changes,
    })
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).io_context("read", path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Positional line comparison of two texts.
///
/// A destination-only tail is reported as additions, a source-only tail as
/// removals, each tagged with its own 1-based line number.
fn compare_lines(source: &str, dest: &str) -> Vec<Change> {
    let src: Vec<&str> = source.lines().collect();
    let dst: Vec<&str> = dest.lines().collect();
    let mut log = ChangeLog::default();

    for idx in 0..src.len().max(dst.len()) {
        let line = idx + 1;
        let recorded = match (src.get(idx), dst.get(idx)) {
            (Some(s), Some(d)) if s == d => continue,
            (Some(s), Some(d)) => {
                log.push(Change::Removed {
                    line,
                    text: (*d).to_string(),
                }) && log.push(Change::Added {
                    line,
                    text: (*s).to_string(),
                })
            }
            (Some(s), None) => log.push(Change::Removed {
                line,
                text: (*s).to_string(),
            }),
            (None, Some(d)) => log.push(Change::Added {
                line,
                text: (*d).to_string(),
            }),
            (None, None) => break,
        };
        if !recorded {
            break;
        }
    }
    log.finish()
}

/// Compare every file under the source directory with its counterpart under
/// `dest` by SHA-256 digest. Destination-only files are not reported.
fn compare_dirs(source: &Path, dest: &Path) -> Result<Vec<Change>> {
    let mut log = ChangeLog::default();
    for entry in WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
        .min_depth(1)
    {
        let entry = entry.map_err(|e| SyncError::Io {
            action: "walk",
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(source) else {
            continue;
        };
        let counterpart = dest.join(rel);
        let change = if !entry_exists(&counterpart) {
            Some(Change::NewFile(rel.to_path_buf()))
        } else if !counterpart.is_file() || digest(entry.path())? != digest(&counterpart)? {
            Some(Change::ModifiedFile(rel.to_path_buf()))
        } else {
            None
        };
        if let Some(change) = change
            && !log.push(change)
        {
            break;
        }
    }
    if log.is_empty() && !log.truncated {
        tracing::debug!("directory {} matches {}", source.display(), dest.display());
    }
    Ok(log.finish())
}

fn digest(path: &Path) -> Result<Vec<u8>> {
    let mut file = fs::File::open(path).io_context("open", path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).io_context("read", path)?;
    Ok(hasher.finalize().to_vec())
}
