//! Named profiles and the persisted current-profile marker.
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::Path;

use super::MappingEntry;
use crate::sync::Mapping;

/// File under the dotfiles root recording the last switched-to profile.
pub const CURRENT_PROFILE_FILE: &str = ".current_profile";

/// Commands reported around a profile switch. They are never executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Hooks {
    /// Reported before the profile's files are installed.
    pub pre_install: Vec<String>,
    /// Reported after the profile's files are installed.
    pub post_install: Vec<String>,
}

impl Hooks {
    /// Total number of hook commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pre_install.len() + self.post_install.len()
    }

    /// Returns `true` if no hooks are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named set of additional mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Mappings installed when switching to this profile.
    pub files: Vec<Mapping>,
    /// Hook commands reported during the switch.
    pub hooks: Hooks,
}

/// Raw profile definition from `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ProfileDef {
    files: Vec<MappingEntry>,
    hooks: Hooks,
}

impl ProfileDef {
    /// Convert to a [`Profile`]; entries without a category default to `files`.
    pub(super) fn into_profile(self) -> Result<Profile> {
        let files = self
            .files
            .into_iter()
            .map(|entry| entry.into_mapping("files"))
            .collect::<Result<_>>()?;
        Ok(Profile {
            files,
            hooks: self.hooks,
        })
    }
}

/// Read the persisted profile name, if any.
#[must_use]
pub fn read_current(root: &Path) -> Option<String> {
    let name = std::fs::read_to_string(root.join(CURRENT_PROFILE_FILE)).ok()?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Persist `name` as the current profile.
///
/// # Errors
///
/// Returns an error if the marker file cannot be written.
pub fn persist(root: &Path, name: &str) -> Result<()> {
    let path = root.join(CURRENT_PROFILE_FILE);
    std::fs::write(&path, format!("{name}\n"))
        .with_context(|| format!("persisting profile to {}", path.display()))
}
