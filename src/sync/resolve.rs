//! Mapping to absolute source/destination path resolution.
use std::path::{Path, PathBuf};

use super::mapping::{Category, Mapping};
use crate::error::Result;

/// Absolute source and destination of one mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Path inside the dotfiles root.
    pub source: PathBuf,
    /// Path the source is installed to.
    pub dest: PathBuf,
}

/// Turns [`Mapping`] records into [`ResolvedPaths`] against a fixed dotfiles
/// root and home directory.
///
/// Resolution is pure: the filesystem is never consulted.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    home: PathBuf,
}

impl PathResolver {
    /// Create a resolver for the given dotfiles root and home directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            home: home.into(),
        }
    }

    /// Dotfiles root this resolver reads sources from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Home directory destinations are resolved against.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Resolve `mapping` to absolute paths.
    ///
    /// The source is `<root>/<category>/<source>`. An explicit destination
    /// wins (with `~/` expanded); otherwise the category's default rule
    /// applies.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`](crate::error::SyncError::Configuration)
    /// if the mapping's category is not recognized.
    pub fn resolve(&self, mapping: &Mapping) -> Result<ResolvedPaths> {
        let category = mapping.category()?;
        let source = self.root.join(category.source_dir()).join(&mapping.source);
        let dest = match &mapping.dest {
            Some(dest) => self.expand_home(dest),
            None => self.default_dest(category, &mapping.source),
        };
        Ok(ResolvedPaths { source, dest })
    }

    fn expand_home(&self, dest: &str) -> PathBuf {
        dest.strip_prefix("~/")
            .map_or_else(|| PathBuf::from(dest), |rest| self.home.join(rest))
    }

    fn default_dest(&self, category: Category, source: &str) -> PathBuf {
        match category {
            Category::Files => self.home.join(format!(".{source}")),
            Category::Config => self.home.join(".config").join(source),
            Category::Bin => {
                let name = Path::new(source)
                    .file_name()
                    .map_or_else(|| PathBuf::from(source), PathBuf::from);
                self.home.join(".local").join("bin").join(name)
            }
        }
    }
}
