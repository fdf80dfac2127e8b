//! Per-snapshot manifest listing the captured paths.
//!
//! Two files are written side by side: a human-readable `backup_info.txt`
//! in the historical layout and a `backup_info.json` that is preferred when
//! reading back. Snapshots that only carry the text file still parse.
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::{IoContext as _, Result, SyncError};

/// File name of the text manifest.
pub const TEXT_FILE: &str = "backup_info.txt";

/// File name of the JSON manifest.
pub const JSON_FILE: &str = "backup_info.json";

const CREATED_PREFIX: &str = "Backup created: ";
const COUNT_PREFIX: &str = "Files backed up: ";
const ENTRY_PREFIX: &str = "- ";

/// Record of when a snapshot was taken and which original paths it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Snapshot creation time.
    pub created: DateTime<FixedOffset>,
    /// Original absolute paths captured, in capture order.
    pub files: Vec<PathBuf>,
}

impl Manifest {
    /// Create a manifest.
    #[must_use]
    pub const fn new(created: DateTime<FixedOffset>, files: Vec<PathBuf>) -> Self {
        Self { created, files }
    }

    /// Write both manifest files into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if either file cannot be written.
    pub fn write(&self, dir: &Path) -> Result<()> {
        let text_path = dir.join(TEXT_FILE);
        fs::write(&text_path, self.to_text()).io_context("write manifest", &text_path)?;

        let json_path = dir.join(JSON_FILE);
        let json = serde_json::to_vec_pretty(self)
            .map_err(io::Error::from)
            .io_context("serialize manifest", &json_path)?;
        fs::write(&json_path, json).io_context("write manifest", &json_path)
    }

    /// Read the manifest stored in `dir`, preferring the JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] if neither file exists,
    /// [`SyncError::Parse`] if the content is malformed, or
    /// [`SyncError::Io`] if a file cannot be read.
    pub fn read(dir: &Path) -> Result<Self> {
        let json_path = dir.join(JSON_FILE);
        match fs::read_to_string(&json_path) {
            Ok(content) => {
                return serde_json::from_str(&content).map_err(|e| {
                    SyncError::parse(format!("manifest {}", json_path.display()), e)
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SyncError::Io {
                    action: "read manifest",
                    path: json_path,
                    source: e,
                });
            }
        }

        let text_path = dir.join(TEXT_FILE);
        let content = fs::read_to_string(&text_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SyncError::NotFound(text_path.clone())
            } else {
                SyncError::Io {
                    action: "read manifest",
                    path: text_path.clone(),
                    source: e,
                }
            }
        })?;
        Self::parse_text(&content)
    }

    /// Render the text manifest.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{CREATED_PREFIX}{}\n{COUNT_PREFIX}{}\n\n",
            self.created.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.files.len()
        );
        for file in &self.files {
            out.push_str(ENTRY_PREFIX);
            out.push_str(&file.to_string_lossy());
            out.push('\n');
        }
        out
    }

    /// Parse the text manifest.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Parse`] if the creation line is missing or its
    /// timestamp is not RFC 3339.
    pub fn parse_text(content: &str) -> Result<Self> {
        let mut created = None;
        let mut files = Vec::new();
        for line in content.lines() {
            if let Some(ts) = line.strip_prefix(CREATED_PREFIX) {
                created = Some(
                    DateTime::parse_from_rfc3339(ts.trim())
                        .map_err(|e| SyncError::parse("manifest creation time", e))?,
                );
            } else if let Some(path) = line.strip_prefix(ENTRY_PREFIX) {
                files.push(PathBuf::from(path));
            }
        }
        let created =
            created.ok_or_else(|| SyncError::parse("text manifest", "missing creation time"))?;
        Ok(Self { created, files })
    }
}

/// Returns `true` if `name` is one of the manifest file names.
#[must_use]
pub fn is_manifest(name: &OsStr) -> bool {
    name == TEXT_FILE || name == JSON_FILE
}
