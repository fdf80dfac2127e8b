//! Mapping records and their categories.
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// Category of a mapping, selecting the source subdirectory and the default
/// destination rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Plain dotfiles, sourced from `files/`, installed at `~/.<source>`.
    Files,
    /// Application config, sourced from `config/`, installed at `~/.config/<source>`.
    Config,
    /// Executables, sourced from `bin/`, installed at `~/.local/bin/<basename>`.
    Bin,
}

impl Category {
    /// All categories in installation order.
    pub const ALL: [Self; 3] = [Self::Files, Self::Config, Self::Bin];

    /// Lowercase identifier as written in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Config => "config",
            Self::Bin => "bin",
        }
    }

    /// Human-readable heading used in command output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Files => "Files",
            Self::Config => "Config files",
            Self::Bin => "Bin files",
        }
    }

    /// Subdirectory of the dotfiles root holding this category's sources.
    #[must_use]
    pub const fn source_dir(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "files" => Ok(Self::Files),
            "config" => Ok(Self::Config),
            "bin" => Ok(Self::Bin),
            other => Err(SyncError::Configuration(other.to_string())),
        }
    }
}

/// A declared link between a source in the dotfiles root and a destination
/// in the home directory.
///
/// The category is carried as the raw configured string and is only
/// validated when the mapping is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Category name (`files`, `config`, or `bin`).
    pub category: String,
    /// Path relative to the category's source directory.
    pub source: String,
    /// Explicit destination; a leading `~/` is expanded to the home directory.
    pub dest: Option<String>,
    /// Permission bits to apply to the destination after copying.
    pub mode: Option<u32>,
    /// Whether to add execute permission to the destination after copying.
    pub executable: bool,
}

impl Mapping {
    /// Create a mapping with the default destination and no mode change.
    #[must_use]
    pub fn new(category: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            source: source.into(),
            dest: None,
            mode: None,
            executable: false,
        }
    }

    /// Set an explicit destination.
    #[must_use]
    pub fn with_dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Set the permission bits applied after copying.
    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Mark the destination executable after copying.
    #[must_use]
    pub const fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    /// Parse the category string.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] for an unrecognized category.
    pub fn category(&self) -> Result<Category, SyncError> {
        self.category.parse()
    }
}
