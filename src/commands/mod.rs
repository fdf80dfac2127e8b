//! Command orchestration shared by the subcommands.
//!
//! Subcommands resolve an [`Environment`], load configuration through
//! [`CommandSetup`], and then drive the sync core one category at a time.
//! Dry-run suppression, backup-before-copy policy, and the run summary all
//! live at this layer; the core never consults process-wide flags.
pub mod backup;
pub mod completions;
pub mod diff;
pub mod profile;
pub mod rollback;
pub mod status;
pub mod update;
pub mod version;

use anyhow::{Context as _, Result};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::backup::BackupStore;
use crate::cli::GlobalOpts;
use crate::config::{CONFIG_FILE, Config, Settings};
use crate::logging::{Logger, StepStatus};
use crate::sync::fs::entry_exists;
use crate::sync::{Category, CopyEngine, CopyOptions, Mapping, PathResolver, compare};

/// Flags that change how a command runs, passed explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Show unchanged entries and extra detail.
    pub verbose: bool,
    /// Report what would happen without writing anything.
    pub dry_run: bool,
}

/// Locations a command operates on.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Dotfiles root containing the `files`, `config` and `bin` trees.
    pub root: PathBuf,
    /// Home directory destinations are resolved against.
    pub home: PathBuf,
    /// Configuration file to load.
    pub config_path: PathBuf,
    /// Run flags.
    pub options: RunOptions,
}

impl Environment {
    /// Build the environment from command-line options and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn detect(global: &GlobalOpts, verbose: bool) -> Result<Self> {
        let home = home_dir()?;
        let root = resolve_root(
            global.root.as_deref(),
            std::env::var_os("DOTFILES_ROOT"),
            &home,
        );
        let options = RunOptions {
            verbose,
            dry_run: global.dry_run,
        };
        let env = Self::new(root, home, options);
        Ok(match &global.config {
            Some(path) => env.with_config_path(path.clone()),
            None => env,
        })
    }

    /// Environment with the default configuration file under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, home: impl Into<PathBuf>, options: RunOptions) -> Self {
        let root = root.into();
        Self {
            config_path: root.join(CONFIG_FILE),
            root,
            home: home.into(),
            options,
        }
    }

    /// Use `path` instead of `<root>/config.toml`.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Backup store under this environment's home directory.
    #[must_use]
    pub fn backup_store(&self) -> BackupStore {
        BackupStore::new(&self.home)
    }

    /// `path` for display, with the home directory shown as `~`.
    #[must_use]
    pub fn tilde(&self, path: &Path) -> String {
        tilde(path, &self.home)
    }
}

/// Current user's home directory.
///
/// # Errors
///
/// Returns an error if neither `HOME` nor (on Windows) `USERPROFILE` is set.
pub fn home_dir() -> Result<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .with_context(|| format!("cannot determine home directory: {var} is not set"))
}

/// Pick the dotfiles root: an explicit path, then `DOTFILES_ROOT`, then
/// `~/.dotfiles`. Existing roots are canonicalized.
#[must_use]
pub fn resolve_root(explicit: Option<&Path>, env_root: Option<OsString>, home: &Path) -> PathBuf {
    let root = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_root.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| home.join(".dotfiles"));
    dunce::canonicalize(&root).unwrap_or(root)
}

/// Render `path` relative to `home` as `~/...` when it lies underneath.
#[must_use]
pub fn tilde(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Counters for one batch of mappings.
///
/// # Examples
///
/// ```
/// use dotfiles_sync::commands::BatchStats;
///
/// let stats = BatchStats { copied: 3, unchanged: 0, skipped: 1 };
/// assert_eq!(stats.summary(false), "3 copied, 1 skipped");
/// assert_eq!(stats.summary(true), "3 would change, 1 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// Mappings copied (or, in a preview, that would change).
    pub copied: u32,
    /// Mappings whose destination already matches.
    pub unchanged: u32,
    /// Mappings skipped because their source is missing.
    pub skipped: u32,
}

impl BatchStats {
    /// One-line summary for the run report.
    #[must_use]
    pub fn summary(&self, preview: bool) -> String {
        let verb = if preview { "would change" } else { "copied" };
        let mut parts = vec![format!("{} {verb}", self.copied)];
        if self.unchanged > 0 {
            parts.push(format!("{} up to date", self.unchanged));
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        parts.join(", ")
    }
}

impl std::ops::AddAssign for BatchStats {
    fn add_assign(&mut self, other: Self) {
        self.copied += other.copied;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
    }
}

/// Configuration and engines shared by the sync commands.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
    /// Resolver bound to the environment's root and home.
    pub resolver: PathResolver,
    /// Copy engine configured from the settings.
    pub engine: CopyEngine,
}

impl CommandSetup {
    /// Load the configuration and build the resolver and copy engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn init(env: &Environment, log: &Logger) -> Result<Self> {
        log.stage("Loading configuration");
        log.debug(&format!("dotfiles root: {}", env.root.display()));
        if !env.config_path.exists() {
            log.warn(&format!(
                "no configuration at {}; nothing to sync",
                env.tilde(&env.config_path)
            ));
        }

        let config = Config::load(&env.config_path)
            .with_context(|| format!("loading {}", env.config_path.display()))?;
        for (category, mappings) in config.groups() {
            log.debug(&format!("{} {category} mappings", mappings.len()));
        }
        log.info(&format!(
            "loaded {} mappings, {} profiles",
            config.mapping_count(),
            config.profiles.len()
        ));

        let engine = CopyEngine::new(CopyOptions {
            create_dirs: config.settings.create_directories,
        });
        Ok(Self {
            resolver: PathResolver::new(&env.root, &env.home),
            engine,
            config,
        })
    }

    /// Copy every mapping in order.
    ///
    /// Missing sources are skipped with a warning; any other failure stops
    /// the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping cannot be resolved or copied.
    pub fn install_mappings(&self, mappings: &[Mapping], log: &Logger) -> Result<BatchStats> {
        let home = self.resolver.home();
        let mut stats = BatchStats::default();
        for mapping in mappings {
            let paths = self
                .resolver
                .resolve(mapping)
                .with_context(|| format!("resolving {}", mapping.source))?;
            match self.engine.copy(&paths.source, &paths.dest, mapping.mode) {
                Ok(files) => log.debug(&format!("{files} file(s) written to {}", paths.dest.display())),
                Err(e) if e.is_not_found() => {
                    log.warn(&format!("source not found, skipping: {}", paths.source.display()));
                    stats.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("copying {}", mapping.source)),
            }
            if mapping.executable {
                self.engine
                    .make_executable(&paths.dest)
                    .with_context(|| format!("marking {} executable", paths.dest.display()))?;
            }
            log.info(&format!("{} → {}", mapping.source, tilde(&paths.dest, home)));
            stats.copied += 1;
        }
        Ok(stats)
    }

    /// Install one category and record the outcome as a summary step.
    ///
    /// Empty groups are skipped without a step.
    pub fn install_group(&self, name: &str, mappings: &[Mapping], log: &Logger) {
        if mappings.is_empty() {
            log.debug(&format!("no {name} configured"));
            return;
        }
        log.stage(name);
        match self.install_mappings(mappings, log) {
            Ok(stats) => {
                let summary = stats.summary(false);
                log.info(&summary);
                log.record_step(name, StepStatus::Ok, Some(&summary));
            }
            Err(e) => {
                log.error(&format!("{name}: {e:#}"));
                log.record_step(name, StepStatus::Failed, Some(&format!("{e:#}")));
            }
        }
    }

    /// Compare every mapping in order and log the results.
    ///
    /// Only entries with changes are shown unless `verbose` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping cannot be resolved or compared.
    pub fn preview_mappings(&self, mappings: &[Mapping], verbose: bool, log: &Logger) -> Result<BatchStats> {
        let mut stats = BatchStats::default();
        for mapping in mappings {
            let paths = self
                .resolver
                .resolve(mapping)
                .with_context(|| format!("resolving {}", mapping.source))?;
            let result = compare(&paths.source, &paths.dest)
                .with_context(|| format!("comparing {}", mapping.source))?;
            if result.has_changes() {
                stats.copied += 1;
            } else {
                stats.unchanged += 1;
            }
            if result.has_changes() || verbose {
                for line in result.render() {
                    log.info(&line);
                }
            }
        }
        Ok(stats)
    }

    /// Preview every configured category, returning the combined counts.
    ///
    /// # Errors
    ///
    /// Returns an error if any mapping cannot be resolved or compared.
    pub fn preview_all(&self, verbose: bool, log: &Logger) -> Result<BatchStats> {
        let mut total = BatchStats::default();
        for (category, mappings) in self.config.groups() {
            if mappings.is_empty() {
                continue;
            }
            log.stage(category.label());
            total += self.preview_mappings(mappings, verbose, log)?;
        }
        if total.copied == 0 {
            log.info("No changes needed - everything is up to date");
        }
        Ok(total)
    }

    /// Existing destinations of `mappings`, deduplicated, in first-seen order.
    ///
    /// Mappings that cannot be resolved are left out; installing them
    /// reports the error.
    pub fn existing_destinations<'a>(
        &self,
        mappings: impl IntoIterator<Item = &'a Mapping>,
    ) -> Vec<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut paths = Vec::new();
        for mapping in mappings {
            let Ok(resolved) = self.resolver.resolve(mapping) else {
                continue;
            };
            if entry_exists(&resolved.dest) && seen.insert(resolved.dest.clone()) {
                paths.push(resolved.dest);
            }
        }
        paths
    }

    /// Snapshot the existing destinations of `mappings`, then prune the
    /// backup store according to the settings.
    ///
    /// Failures are logged as warnings and recorded as a skipped step; the
    /// caller goes on to copy regardless.
    pub fn backup_destinations<'a>(
        &self,
        env: &Environment,
        mappings: impl IntoIterator<Item = &'a Mapping>,
        log: &Logger,
    ) {
        const STEP: &str = "Backup";
        log.stage("Backing up existing files");
        let paths = self.existing_destinations(mappings);
        match self.snapshot(env, &paths, log) {
            Ok(Some(summary)) => log.record_step(STEP, StepStatus::Ok, Some(&summary)),
            Ok(None) => {
                log.info("nothing to back up");
                log.record_step(STEP, StepStatus::Ok, Some("nothing to back up"));
            }
            Err(e) => {
                log.warn(&format!("backup failed, continuing without it: {e:#}"));
                log.record_step(STEP, StepStatus::Skipped, Some("backup failed"));
            }
        }
    }

    fn snapshot(&self, env: &Environment, paths: &[PathBuf], log: &Logger) -> Result<Option<String>> {
        let store = env.backup_store();
        let Some(set) = store.create(paths)? else {
            return Ok(None);
        };
        log.info(&format!(
            "backed up {} path(s) to {}",
            set.files.len(),
            env.tilde(&set.dir)
        ));

        report_prune(prune(&store, &self.config.settings), log);
        Ok(Some(format!("{} path(s)", set.files.len())))
    }
}

/// Apply the retention settings after a fresh snapshot.
fn prune(store: &BackupStore, settings: &Settings) -> crate::error::Result<usize> {
    let mut pruned = 0;
    if settings.max_backup_count > 0 {
        pruned += store.rotate(settings.max_backup_count)?;
    }
    if settings.backup_retention_days > 0 {
        pruned += store.clean(settings.backup_retention_days)?;
    }
    Ok(pruned)
}

/// Log the outcome of [`prune`]. A failure only warns: the snapshot itself
/// was written.
fn report_prune(result: crate::error::Result<usize>, log: &Logger) {
    match result {
        Ok(0) => {}
        Ok(pruned) => log.info(&format!("pruned {pruned} old backup(s)")),
        Err(e) => log.warn(&format!("could not prune old backups: {e}")),
    }
}

/// Install `groups` in order, each as its own summary step.
pub fn install_groups(setup: &CommandSetup, groups: &[(Category, &[Mapping])], log: &Logger) {
    for (category, mappings) in groups {
        setup.install_group(category.label(), mappings, log);
    }
}

/// Print the run summary and fail if any step failed.
///
/// # Errors
///
/// Returns an error if one or more steps recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} step(s) failed");
    }
    Ok(())
}
