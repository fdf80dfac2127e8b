//! Command: show the sync status of every mapping.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::{CommandSetup, Environment, tilde};
use crate::config::profiles;
use crate::logging::Logger;
use crate::sync::{DiffResult, DiffStatus, Mapping, compare};

/// Tally of mapping states.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StatusCounts {
    synced: usize,
    modified: usize,
    new: usize,
    missing: usize,
}

impl StatusCounts {
    fn add(&mut self, status: DiffStatus) {
        match status {
            DiffStatus::Identical => self.synced += 1,
            DiffStatus::Modified => self.modified += 1,
            DiffStatus::New => self.new += 1,
            DiffStatus::SourceMissing => self.missing += 1,
        }
    }

    fn summary(&self) -> String {
        format!(
            "{} in sync, {} modified, {} not installed, {} missing source",
            self.synced, self.modified, self.new, self.missing
        )
    }
}

/// One status line for a compared mapping.
fn status_line(mapping: &Mapping, result: &DiffResult, home: &Path) -> String {
    let (icon, label) = match result.status {
        DiffStatus::Identical => ("\x1b[32m✓\x1b[0m", "in sync"),
        DiffStatus::Modified => ("\x1b[33m~\x1b[0m", "modified"),
        DiffStatus::New => ("\x1b[36m+\x1b[0m", "not installed"),
        DiffStatus::SourceMissing => ("\x1b[31m✗\x1b[0m", "source missing"),
    };
    format!(
        "{icon} {} → {} ({label})",
        mapping.source,
        tilde(&result.dest, home)
    )
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if configuration loading or the backup listing fails, or
/// a mapping cannot be resolved or compared.
pub fn run(env: &Environment, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(env, log)?;

    log.stage("Status");
    log.info(&format!("root: {}", env.tilde(&env.root)));
    let current = profiles::read_current(&env.root);
    log.info(&format!("profile: {}", current.as_deref().unwrap_or("none")));
    let last_backup = env.backup_store().list()?.into_iter().next();
    log.info(&format!(
        "last backup: {}",
        last_backup.map_or_else(|| "none".to_string(), |set| set.display_time())
    ));

    let mut counts = StatusCounts::default();
    for (category, mappings) in setup.config.groups() {
        if mappings.is_empty() {
            continue;
        }
        log.stage(category.label());
        for mapping in mappings {
            let paths = setup
                .resolver
                .resolve(mapping)
                .with_context(|| format!("resolving {}", mapping.source))?;
            let result = compare(&paths.source, &paths.dest)
                .with_context(|| format!("comparing {}", mapping.source))?;
            counts.add(result.status);
            log.info(&status_line(mapping, &result, &env.home));
        }
    }

    log.info(&counts.summary());
    Ok(())
}
