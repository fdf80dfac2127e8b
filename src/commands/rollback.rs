//! Command: restore a backup snapshot into the home directory.
use anyhow::{Context as _, Result, bail};

use super::Environment;
use crate::cli::RollbackOpts;
use crate::logging::Logger;
use crate::prompt::Prompt;

/// Run the rollback command.
///
/// # Errors
///
/// Returns an error if there is no snapshot with the requested number, the
/// confirmation cannot be read, or the restore fails part-way.
pub fn run(env: &Environment, opts: &RollbackOpts, prompt: &dyn Prompt, log: &Logger) -> Result<()> {
    let store = env.backup_store();
    let sets = store.list().context("listing backups")?;
    if sets.is_empty() {
        bail!("no backups found in {}", env.tilde(store.root()));
    }
    let index = usize::try_from(opts.number)
        .unwrap_or(usize::MAX)
        .saturating_sub(1);
    let Some(set) = sets.get(index) else {
        bail!(
            "backup #{} does not exist ({} available)",
            opts.number,
            sets.len()
        );
    };

    log.stage(&format!("Rolling back to backup #{}", opts.number));
    log.info(&format!(
        "{} ({} file(s))",
        set.display_time(),
        set.files.len()
    ));
    for file in &set.files {
        log.info(&format!("  - {}", env.tilde(file)));
    }

    if env.options.dry_run {
        log.dry_run(&format!("would restore {}", env.tilde(&set.dir)));
        return Ok(());
    }

    let question = format!("Restore backup from {}?", set.display_time());
    if !opts.yes && !prompt.confirm(&question)? {
        log.info("rollback cancelled");
        return Ok(());
    }

    let restored = store
        .restore(&set.dir)
        .with_context(|| format!("restoring {}", set.dir.display()))?;
    log.info(&format!("restored {restored} entries"));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::RunOptions;
    use crate::logging::isolated_logger;
    use crate::prompt::MockPrompt;
    use std::fs;
    use std::path::Path;

    /// Home with one snapshot of `.zshrc` ("v1") and the live file at "v2".
    fn env_with_backup(home: &Path, options: RunOptions) -> Environment {
        let env = Environment::new(home.join("dotfiles"), home, options);
        fs::write(home.join(".zshrc"), "v1\n").unwrap();
        env.backup_store()
            .create(&[home.join(".zshrc")])
            .unwrap()
            .unwrap();
        fs::write(home.join(".zshrc"), "v2\n").unwrap();
        env
    }

    fn opts(yes: bool) -> RollbackOpts {
        RollbackOpts { number: 1, yes }
    }

    #[test]
    fn confirmed_rollback_restores() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_backup(tmp.path(), RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();
        let mut prompt = MockPrompt::new();
        prompt.expect_confirm().times(1).returning(|_| Ok(true));

        run(&env, &opts(false), &prompt, &log).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join(".zshrc")).unwrap(), "v1\n");
    }

    #[test]
    fn declined_rollback_keeps_current_files() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_backup(tmp.path(), RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();
        let mut prompt = MockPrompt::new();
        prompt.expect_confirm().times(1).returning(|_| Ok(false));

        run(&env, &opts(false), &prompt, &log).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join(".zshrc")).unwrap(), "v2\n");
    }

    #[test]
    fn yes_skips_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_backup(tmp.path(), RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();
        let mut prompt = MockPrompt::new();
        prompt.expect_confirm().never();

        run(&env, &opts(true), &prompt, &log).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join(".zshrc")).unwrap(), "v1\n");
    }

    #[test]
    fn dry_run_restores_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        let env = env_with_backup(tmp.path(), options);
        let (log, _tmp, _guard) = isolated_logger();
        let mut prompt = MockPrompt::new();
        prompt.expect_confirm().never();

        run(&env, &opts(false), &prompt, &log).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join(".zshrc")).unwrap(), "v2\n");
    }

    #[test]
    fn out_of_range_number_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_with_backup(tmp.path(), RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();
        let prompt = MockPrompt::new();

        let err = run(&env, &RollbackOpts { number: 2, yes: true }, &prompt, &log).unwrap_err();

        assert_eq!(err.to_string(), "backup #2 does not exist (1 available)");
    }

    #[test]
    fn no_backups_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path().join("dotfiles"), tmp.path(), RunOptions::default());
        let (log, _tmp, _guard) = isolated_logger();

        let err = run(&env, &opts(true), &MockPrompt::new(), &log).unwrap_err();

        assert!(err.to_string().starts_with("no backups found"), "{err}");
    }
}
