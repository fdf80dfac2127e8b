//! Command: list, clean, and rotate backup snapshots.
use anyhow::{Context as _, Result};

use super::Environment;
use crate::backup::{BackupSet, BackupStore};
use crate::cli::BackupCommand;
use crate::logging::Logger;

/// Run a `backup` subcommand.
///
/// # Errors
///
/// Returns an error if the backup root cannot be read or a snapshot cannot
/// be removed.
pub fn run(env: &Environment, command: &BackupCommand, log: &Logger) -> Result<()> {
    let store = env.backup_store();
    match command {
        BackupCommand::List => list(env, &store, log),
        BackupCommand::Clean { days } => clean(env, &store, *days, log),
        BackupCommand::Rotate { count } => {
            rotate(env, &store, usize::try_from(*count).unwrap_or(usize::MAX), log)
        }
    }
}

fn list(env: &Environment, store: &BackupStore, log: &Logger) -> Result<()> {
    let sets = store.list().context("listing backups")?;
    if sets.is_empty() {
        log.info(&format!("no backups in {}", env.tilde(store.root())));
        return Ok(());
    }

    log.stage("Backups");
    for (index, set) in sets.iter().enumerate() {
        log.info(&format!(
            "{:>3}. {}  {} file(s)  {}",
            index + 1,
            set.display_time(),
            set.files.len(),
            env.tilde(&set.dir)
        ));
        if env.options.verbose {
            for file in &set.files {
                log.info(&format!("       - {}", env.tilde(file)));
            }
        }
    }
    Ok(())
}

fn clean(env: &Environment, store: &BackupStore, days: u32, log: &Logger) -> Result<()> {
    log.stage(&format!("Removing backups older than {days} day(s)"));
    if env.options.dry_run {
        let expired = store.expired(days).context("listing backups")?;
        report_would_remove(env, &expired, log);
        return Ok(());
    }
    let removed = store.clean(days).context("cleaning backups")?;
    log.info(&format!("removed {removed} backup(s)"));
    Ok(())
}

fn rotate(env: &Environment, store: &BackupStore, keep: usize, log: &Logger) -> Result<()> {
    log.stage(&format!("Keeping the {keep} newest backup(s)"));
    if env.options.dry_run {
        let surplus = store.surplus(keep).context("listing backups")?;
        report_would_remove(env, &surplus, log);
        return Ok(());
    }
    let removed = store.rotate(keep).context("rotating backups")?;
    log.info(&format!("removed {removed} backup(s)"));
    Ok(())
}

fn report_would_remove(env: &Environment, sets: &[BackupSet], log: &Logger) {
    if sets.is_empty() {
        log.info("nothing to remove");
    }
    for set in sets {
        log.dry_run(&format!("would remove {}", env.tilde(&set.dir)));
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backup::BACKUP_DIR_NAME;
    use crate::commands::RunOptions;
    use crate::logging::isolated_logger;
    use std::fs;
    use std::path::Path;

    fn env_with_snapshots(home: &Path, names: &[&str], options: RunOptions) -> Environment {
        for name in names {
            fs::create_dir_all(home.join(BACKUP_DIR_NAME).join(name)).unwrap();
        }
        Environment::new(home.join("dotfiles"), home, options)
    }

    const OLD: [&str; 3] = [
        "backup_2001-01-01_00-00-00",
        "backup_2002-01-01_00-00-00",
        "backup_2003-01-01_00-00-00",
    ];

    #[test]
    fn clean_removes_expired_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_snapshots(tmp.path(), &OLD, RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();

        run(&env, &BackupCommand::Clean { days: 30 }, &log).unwrap();

        assert!(env.backup_store().list().unwrap().is_empty());
    }

    #[test]
    fn clean_dry_run_keeps_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        let env = env_with_snapshots(tmp.path(), &OLD, options);
        let (log, tmp_log, _guard) = isolated_logger();

        run(&env, &BackupCommand::Clean { days: 30 }, &log).unwrap();

        assert_eq!(env.backup_store().list().unwrap().len(), 3);
        let logged = fs::read_to_string(tmp_log.path().join("test.log")).unwrap();
        assert_eq!(logged.matches("would remove").count(), 3, "{logged}");
    }

    #[test]
    fn rotate_keeps_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_snapshots(tmp.path(), &OLD, RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();

        run(&env, &BackupCommand::Rotate { count: 2 }, &log).unwrap();

        let names: Vec<_> = env
            .backup_store()
            .list()
            .unwrap()
            .iter()
            .map(|s| s.dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![OLD[2], OLD[1]]);
    }

    #[test]
    fn list_without_backups_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_snapshots(tmp.path(), &[], RunOptions::default());
        let (log, tmp_log, _guard) = isolated_logger();

        run(&env, &BackupCommand::List, &log).unwrap();

        let logged = fs::read_to_string(tmp_log.path().join("test.log")).unwrap();
        assert!(logged.contains("no backups in"), "{logged}");
    }
}
