//! Loading `config.toml` into settings, ordered mappings, and profiles.
//!
//! This is the only place that knows the configuration format; the sync
//! core receives plain [`Mapping`] values.
pub mod profiles;
pub mod toml_loader;

use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::sync::{Category, Mapping};
pub use profiles::{Hooks, Profile};

/// Default configuration file name under the dotfiles root.
pub const CONFIG_FILE: &str = "config.toml";

/// Behavioural settings from the `[settings]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snapshot existing destinations before overwriting them.
    pub backup_existing: bool,
    /// Create missing parent directories of destinations.
    pub create_directories: bool,
    /// After an update, remove snapshots older than this many days (0 = off).
    pub backup_retention_days: u32,
    /// After an update, keep only this many newest snapshots (0 = off).
    pub max_backup_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_existing: true,
            create_directories: true,
            backup_retention_days: 0,
            max_backup_count: 5,
        }
    }
}

/// Permission bits written either as an octal string (`"0755"`) or an
/// integer (`0o755`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ModeValue {
    Bits(u32),
    Octal(String),
}

impl ModeValue {
    /// Resolve to permission bits; zero means "leave unchanged".
    fn bits(&self) -> Result<Option<u32>> {
        let bits = match self {
            Self::Bits(bits) => *bits,
            Self::Octal(text) => {
                let digits = text.trim().trim_start_matches("0o");
                match u32::from_str_radix(digits, 8) {
                    Ok(bits) => bits,
                    Err(e) => bail!("invalid mode '{text}': {e}"),
                }
            }
        };
        if bits > 0o7777 {
            bail!("mode {bits:o} is out of range");
        }
        Ok((bits != 0).then_some(bits))
    }
}

/// One mapping entry as written in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MappingEntry {
    source: String,
    #[serde(default)]
    dest: Option<String>,
    #[serde(default)]
    mode: Option<ModeValue>,
    #[serde(default)]
    executable: bool,
    #[serde(default)]
    category: Option<String>,
}

impl MappingEntry {
    /// Convert to a [`Mapping`], using `default_category` unless the entry
    /// names its own.
    fn into_mapping(self, default_category: &str) -> Result<Mapping> {
        let mode = match &self.mode {
            Some(mode) => mode.bits()?,
            None => None,
        };
        Ok(Mapping {
            category: self
                .category
                .unwrap_or_else(|| default_category.to_string()),
            source: self.source,
            dest: self.dest,
            mode,
            executable: self.executable,
        })
    }
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    settings: Settings,
    files: Vec<MappingEntry>,
    config: Vec<MappingEntry>,
    bin: Vec<MappingEntry>,
    profiles: BTreeMap<String, profiles::ProfileDef>,
}

/// Fully loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File the configuration was loaded from.
    pub path: PathBuf,
    /// Behavioural settings.
    pub settings: Settings,
    /// `[[files]]` mappings in file order.
    pub files: Vec<Mapping>,
    /// `[[config]]` mappings in file order.
    pub config: Vec<Mapping>,
    /// `[[bin]]` mappings in file order.
    pub bin: Vec<Mapping>,
    /// Named profiles, sorted by name.
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Load configuration from `path`. A missing file yields defaults with
    /// no mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a mode
    /// value is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawConfig = toml_loader::load_config(path)?;
        Self::from_raw(path, raw)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Self::from_raw(path, raw)
    }

    fn from_raw(path: &Path, raw: RawConfig) -> Result<Self> {
        let convert = |entries: Vec<MappingEntry>, category: Category| {
            entries
                .into_iter()
                .map(|entry| entry.into_mapping(category.as_str()))
                .collect::<Result<Vec<_>>>()
        };
        let profiles = raw
            .profiles
            .into_iter()
            .map(|(name, def)| -> Result<(String, Profile)> { Ok((name, def.into_profile()?)) })
            .collect::<Result<_>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            settings: raw.settings,
            files: convert(raw.files, Category::Files)?,
            config: convert(raw.config, Category::Config)?,
            bin: convert(raw.bin, Category::Bin)?,
            profiles,
        })
    }

    /// Mapping groups in installation order.
    #[must_use]
    pub fn groups(&self) -> [(Category, &[Mapping]); 3] {
        [
            (Category::Files, self.files.as_slice()),
            (Category::Config, self.config.as_slice()),
            (Category::Bin, self.bin.as_slice()),
        ]
    }

    /// Total number of top-level mappings.
    #[must_use]
    pub fn mapping_count(&self) -> usize {
        self.files.len() + self.config.len() + self.bin.len()
    }
}
